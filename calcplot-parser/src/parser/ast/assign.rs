use crate::parser::ast::expr::Expr;
use std::{fmt, ops::Range};

/// An assignment, such as `x = 2`.
///
/// Nothing in an arithmetic expression can be assigned to; the node exists so that the attempt
/// can be reported precisely.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    /// The expression on the left-hand side of the `=`.
    pub target: Box<Expr>,

    /// The value being assigned.
    pub value: Box<Expr>,

    /// The region of the source code that this assignment was parsed from.
    pub span: Range<usize>,
}

impl Assign {
    /// Returns the span of the assignment.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}
