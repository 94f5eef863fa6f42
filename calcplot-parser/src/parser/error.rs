//! Syntax diagnostics produced while parsing an expression.

use ariadne::Fmt;
use calcplot_attrs::ErrorKind;
use calcplot_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

pub use calcplot_error::Error;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of expression",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of expression",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
    help = "operators must be written between operands, for example `2*x` instead of `2 x`",
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected `{}`", self.lexeme),
    labels = [format!(
        "expected one of: {}",
        self.expected.iter().map(|kind| format!("{:?}", kind)).collect::<Vec<_>>().join(", ")
    )],
    help = format!("found {:?}", self.found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The kind of token that was found.
    pub found: TokenKind,

    /// The raw text of the token that was found.
    pub lexeme: String,
}

/// A parenthesis or square bracket was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if self.opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A number literal could not be represented as a floating-point value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", self.lexeme),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    /// The raw text of the literal.
    pub lexeme: String,
}
