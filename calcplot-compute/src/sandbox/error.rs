//! Diagnostics for expressions that are rejected by the sandbox.

use ariadne::Fmt;
use calcplot_attrs::ErrorKind;
use calcplot_error::{ErrorKind, EXPR};

/// Formats a "did you mean" hint for a list of suggestions.
fn did_you_mean(what: &str, suggestions: &[String], fallback: &str) -> String {
    match suggestions {
        [] => fallback.to_string(),
        [only] => format!("did you mean `{}`?", only.fg(EXPR)),
        many => format!(
            "did you mean one of these {}? {}",
            what,
            many.iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// The function is not one of the allowed functions.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function does not exist", self.name),
    labels = ["this function"],
    help = did_you_mean(
        "functions",
        &self.suggestions,
        "the available functions are sin, cos, tan, log, log10, exp and sqrt",
    ),
)]
pub struct UnknownFunction {
    /// The name of the function that was called.
    pub name: String,

    /// Similarly named functions, if any.
    pub suggestions: Vec<String>,
}

/// The name is neither the variable nor a known constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not defined", self.name),
    labels = ["this name"],
    help = did_you_mean(
        "names",
        &self.suggestions,
        "expressions may only use the variable `x` and the constants `pi` and `e`",
    ),
)]
pub struct UnknownVariable {
    /// The name that was used.
    pub name: String,

    /// Similarly named constants or the variable, if any.
    pub suggestions: Vec<String>,
}

/// Member access, such as `x.real`, is not allowed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("member access `.{}` is not allowed", self.member),
    labels = ["this member access"],
)]
pub struct MemberAccess {
    /// The name of the member.
    pub member: String,
}

/// Subscripts, such as `x[0]`, are not allowed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "subscripts are not allowed",
    labels = ["this subscript"],
)]
pub struct Subscript;

/// Assignments, such as `x = 1`, are not allowed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "assignments are not allowed",
    labels = ["this assignment"],
    help = "write only the expression to compute",
)]
pub struct Assignment;

/// Only bare function names can be called.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "only functions can be called",
    labels = ["this is called like a function"],
    help = format!("call one of the functions by name, such as {}", "sin(x)".fg(EXPR)),
)]
pub struct DynamicCallee;

/// Strings have no meaning in arithmetic.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "string literals are not allowed",
    labels = ["this string"],
)]
pub struct StringLiteral;

/// A constant or the variable was called like a function.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a function", self.name),
    labels = ["this is called like a function"],
    help = format!(
        "to multiply, write the operator explicitly: {}",
        format!("{}*(...)", self.name).fg(EXPR),
    ),
)]
pub struct NotAFunction {
    /// The name that was called.
    pub name: String,
}

/// A function was used without being called.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function must be called", self.name),
    labels = ["this function"],
    help = format!("add an argument: {}", format!("{}(x)", self.name).fg(EXPR)),
)]
pub struct NotAValue {
    /// The name of the function.
    pub name: String,
}
