pub mod ast;
pub mod error;
pub mod iter;
pub mod op;

use error::{Error, ExpectedEof, UnexpectedEof, UnexpectedToken};
use calcplot_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A high-level parser for arithmetic expressions. This is the type to use to parse an
/// expression string into an abstract syntax tree.
///
/// Whitespace is insignificant and is dropped before parsing.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The length of the source code, used to point at the end of the input.
    source_len: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        let tokens = tokenize_complete(source)
            .into_vec()
            .into_iter()
            .filter(|token| !token.is_whitespace())
            .collect();
        Self {
            tokens,
            cursor: 0,
            source_len: source.len(),
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.source_len..self.source_len
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the kind of the current token, without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.current_token().map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(UnexpectedEof)),
        }
    }

    /// Consumes the next token if it has the given kind. Otherwise, an error describing the
    /// `expected` token kinds is returned and the cursor is left unchanged.
    pub fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static [TokenKind],
    ) -> Result<Token<'source>, Error> {
        match self.current_token() {
            Some(token) if token.kind == kind => self.next_token(),
            Some(token) => Err(self.error(UnexpectedToken {
                expected,
                found: token.kind,
                lexeme: token.lexeme.to_string(),
            })),
            None => Err(self.error(UnexpectedEof)),
        }
    }

    /// Consumes the next token if it has the given kind, returning it. Returns [`None`] without
    /// moving the cursor otherwise.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'source>> {
        match self.current_token() {
            Some(token) if token.kind == kind => self.next_token().ok(),
            _ => None,
        }
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error spanning the remaining input is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            let start = self.span().start;
            Err(Error::new(vec![start..self.source_len], ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        assign::Assign,
        binary::Binary,
        call::Call,
        expr::Expr,
        index::Index,
        literal::{LitNum, LitStr, LitSym, Literal},
        member::Member,
        paren::Paren,
        unary::Unary,
    };
    use error::{EmptyParenthesis, UnclosedParenthesis};
    use op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn parse(source: &str) -> Result<Expr, Error> {
        Parser::new(source).try_parse_full::<Expr>()
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn num(value: f64, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Number(LitNum { value, span }))
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16").unwrap(), num(16.0, 0..2));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("3.14").unwrap(), num(3.14, 0..4));
        assert_eq!(parse(".5").unwrap(), num(0.5, 0..2));
    }

    #[test]
    fn binary_precedence() {
        let expr = parse("1 + 2 * x").unwrap();
        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(num(1.0, 0..1)),
            op: BinOp { kind: BinOpKind::Add, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(num(2.0, 4..5)),
                op: BinOp { kind: BinOpKind::Mul, span: 6..7 },
                rhs: Box::new(sym("x", 8..9)),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn left_associative_subtraction() {
        assert_eq!(parse("8-4-2").unwrap().to_string(), "8 - 4 - 2");
        let Expr::Binary(binary) = parse("8-4-2").unwrap() else {
            panic!("expected a binary expression");
        };
        assert_eq!(binary.rhs.to_string(), "2");
    }

    #[test]
    fn exponent_right_associative() {
        let Expr::Binary(binary) = parse("2**3**2").unwrap() else {
            panic!("expected a binary expression");
        };
        assert_eq!(binary.lhs.to_string(), "2");
        assert_eq!(binary.rhs.to_string(), "3**2");
    }

    #[test]
    fn negation_binds_looser_than_power() {
        let expr = parse("-x**2").unwrap();
        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("x", 1..2)),
                op: BinOp { kind: BinOpKind::Exp, span: 2..4 },
                rhs: Box::new(num(2.0, 4..5)),
                span: 1..5,
            })),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..5,
        }));
    }

    #[test]
    fn negative_exponent() {
        assert_eq!(parse("2**-x").unwrap().to_string(), "2**-x");
    }

    #[test]
    fn function_call() {
        let expr = parse("sin(x)").unwrap();
        assert_eq!(expr, Expr::Call(Call {
            callee: Box::new(sym("sin", 0..3)),
            args: vec![sym("x", 4..5)],
            span: 0..6,
            paren_span: 3..6,
        }));
    }

    #[test]
    fn parenthesized() {
        let expr = parse("(x)").unwrap();
        assert_eq!(expr, Expr::Paren(Paren {
            expr: Box::new(sym("x", 1..2)),
            span: 0..3,
        }));
    }

    #[test]
    fn member_call_with_string() {
        let expr = parse("os.system('x')").unwrap();
        assert_eq!(expr, Expr::Call(Call {
            callee: Box::new(Expr::Member(Member {
                target: Box::new(sym("os", 0..2)),
                member: LitSym { name: "system".to_string(), span: 3..9 },
                span: 0..9,
            })),
            args: vec![Expr::Literal(Literal::Str(LitStr {
                value: "x".to_string(),
                span: 10..13,
            }))],
            span: 0..14,
            paren_span: 9..14,
        }));
    }

    #[test]
    fn attribute_chain() {
        let expr = parse("x.__class__.__bases__").unwrap();
        assert_eq!(expr.to_string(), "x.__class__.__bases__");
        assert!(matches!(expr, Expr::Member(_)));
    }

    #[test]
    fn subscript() {
        let expr = parse("x[0]").unwrap();
        assert_eq!(expr, Expr::Index(Index {
            target: Box::new(sym("x", 0..1)),
            index: Box::new(num(0.0, 2..3)),
            span: 0..4,
        }));
    }

    #[test]
    fn assignment() {
        let expr = parse("x = 2").unwrap();
        assert_eq!(expr, Expr::Assign(Assign {
            target: Box::new(sym("x", 0..1)),
            value: Box::new(num(2.0, 4..5)),
            span: 0..5,
        }));
    }

    #[test]
    fn multiple_args() {
        let Expr::Call(call) = parse("f(1, x, 2)").unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.args.len(), 3);
    }

    #[test]
    fn unclosed_paren() {
        let err = parse("(1 + 2").unwrap_err();
        assert_eq!(err.downcast_ref(), Some(&UnclosedParenthesis { opening: true }));
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn stray_close_paren() {
        let err = parse(")").unwrap_err();
        assert_eq!(err.downcast_ref(), Some(&UnclosedParenthesis { opening: false }));
    }

    #[test]
    fn empty_paren() {
        let err = parse("2*()").unwrap_err();
        assert!(err.is::<EmptyParenthesis>());
    }

    #[test]
    fn trailing_input() {
        let err = parse("2 x").unwrap_err();
        assert!(err.is::<ExpectedEof>());
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn caret_is_not_an_operator() {
        let err = parse("x^2").unwrap_err();
        assert!(err.is::<ExpectedEof>());
    }

    #[test]
    fn empty_input() {
        let err = parse("").unwrap_err();
        assert!(err.is::<UnexpectedEof>());
    }

    #[test]
    fn dangling_operator() {
        let err = parse("1 +").unwrap_err();
        assert!(err.is::<UnexpectedEof>());
    }

    #[test]
    fn display_round_trip() {
        let source = "2*x + sin(x**2)/(1 - e)";
        assert_eq!(parse(source).unwrap().to_string(), source);
    }
}
