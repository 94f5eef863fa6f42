use crate::{
    parser::{
        error::{Error, InvalidNumber, UnexpectedEof, UnexpectedToken},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// The token kinds that can start a literal.
pub const LITERAL_START: &[TokenKind] = &[
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Name,
    TokenKind::Str,
];

/// A number literal. Integers and decimals are both stored as [`f64`].
#[derive(Debug, Clone, PartialEq)]
pub struct LitNum {
    /// The value of the number literal.
    pub value: f64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A string literal, such as `'abc'`. Strings have no meaning in arithmetic; they are only parsed
/// so that they can be pointed at and rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct LitStr {
    /// The contents of the string, without the surrounding quotes.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A symbol / identifier literal, such as `x`, `pi`, or the `sin` in `sin(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// Represents a literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A number literal, such as `2` or `3.14`.
    Number(LitNum),

    /// A string literal, such as `'ls'`.
    Str(LitStr),

    /// A symbol, such as `x`.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Str(string) => string.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.expect(TokenKind::Name, &[TokenKind::Name])?;
        Ok(Self {
            name: token.lexeme.to_string(),
            span: token.span,
        })
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let Some(token) = input.current_token().cloned() else {
            return Err(input.error(UnexpectedEof));
        };

        match token.kind {
            TokenKind::Int | TokenKind::Float => {
                input.next_token()?;
                match token.lexeme.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(Literal::Number(LitNum {
                        value,
                        span: token.span,
                    })),
                    _ => Err(Error::new(vec![token.span], InvalidNumber {
                        lexeme: token.lexeme.to_string(),
                    })),
                }
            },
            TokenKind::Str => {
                input.next_token()?;
                let inner = &token.lexeme[1..token.lexeme.len() - 1];
                Ok(Literal::Str(LitStr {
                    value: inner.to_string(),
                    span: token.span,
                }))
            },
            TokenKind::Name => LitSym::parse(input).map(Literal::Symbol),
            found => Err(input.error(UnexpectedToken {
                expected: LITERAL_START,
                found,
                lexeme: token.lexeme.to_string(),
            })),
        }
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(num) => write!(f, "{}", num.value),
            Literal::Str(string) => write!(f, "'{}'", string.value),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}
