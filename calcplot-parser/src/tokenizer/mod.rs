pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Input the lexer cannot match is kept as [`TokenKind::Symbol`], so the parser can point at it.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn power_and_floats() {
        compare_tokens(
            "2.5*x**.5",
            [
                (TokenKind::Float, "2.5"),
                (TokenKind::Mul, "*"),
                (TokenKind::Name, "x"),
                (TokenKind::Exp, "**"),
                (TokenKind::Float, ".5"),
            ],
        );
    }

    #[test]
    fn cyrillic_names() {
        compare_tokens(
            "корінь(лог10(x))",
            [
                (TokenKind::Name, "корінь"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "лог10"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::CloseParen, ")"),
            ],
        );
    }

    #[test]
    fn escape_shapes() {
        compare_tokens(
            "os.system('ls')[0] $",
            [
                (TokenKind::Name, "os"),
                (TokenKind::Dot, "."),
                (TokenKind::Name, "system"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Str, "'ls'"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::OpenSquare, "["),
                (TokenKind::Int, "0"),
                (TokenKind::CloseSquare, "]"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
            ],
        );
    }

    #[test]
    fn complete_keeps_spans() {
        let tokens = tokenize_complete("x.__class__");
        let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(kinds, [TokenKind::Name, TokenKind::Dot, TokenKind::Name]);
        assert_eq!(tokens[2].span, 2..11);
        assert_eq!(tokens[2].lexeme, "__class__");
    }
}
