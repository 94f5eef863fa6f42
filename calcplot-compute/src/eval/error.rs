//! Diagnostics produced while evaluating an expression.

use ariadne::Fmt;
use calcplot_attrs::ErrorKind;
use calcplot_error::{ErrorKind, EXPR};

pub use calcplot_error::Error;

/// The right-hand side of a division evaluated to zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this division", "this expression evaluated to zero"],
)]
pub struct DivisionByZero;

/// A function was called with an argument outside of its domain, such as `log(-1)`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not defined for {}", self.name, self.arg),
    labels = ["this function call", "this argument is out of range"],
    help = format!("the `{}` function only accepts {}", (&self.name).fg(EXPR), self.domain),
)]
pub struct DomainError {
    /// The name of the function, as written.
    pub name: String,

    /// The argument the function was called with.
    pub arg: f64,

    /// A description of the accepted inputs.
    pub domain: String,
}

/// An operation overflowed or produced an undefined number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the result is not a finite number",
    labels = ["this operation overflowed or is undefined"],
    note = "examples include `0 ** -1`, `(-8) ** 0.5`, and `exp(1000)`",
)]
pub struct NonFiniteResult;

/// The variable was used where it has no value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the variable `{}` has no value here", self.name),
    labels = ["this variable"],
    help = format!(
        "remove `{}` to compute a single number, or plot the expression instead",
        (&self.name).fg(EXPR),
    ),
)]
pub struct UnboundVariable {
    /// The name of the variable.
    pub name: String,
}

/// The name does not refer to anything that has a value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not defined", self.name),
    labels = ["this name"],
)]
pub struct UndefinedSymbol {
    /// The name that was used.
    pub name: String,
}

/// A function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("wrong number of arguments for the `{}` function", self.name),
    labels = ["this function call", ""],
    help = format!(
        "the `{}` function takes {} argument(s); there are {} argument(s) provided here",
        (&self.name).fg(EXPR),
        self.expected,
        self.given,
    ),
)]
pub struct ArgumentCount {
    /// The name of the function that was called.
    pub name: String,

    /// The number of arguments that were expected.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// The expression contains a kind of node that cannot be evaluated.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{} cannot be evaluated", self.node),
    labels = ["this expression"],
)]
pub struct UnsupportedNode {
    /// A description of the node, such as "a member access".
    pub node: &'static str,
}
