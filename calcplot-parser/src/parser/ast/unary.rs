use crate::parser::{
    ast::{binary::Binary, expr::{Expr, Primary}},
    error::Error,
    op::{Precedence, UnaryOp, UnaryOpKind},
    Parser,
};
use std::{fmt, ops::Range};

/// A unary expression, such as `-x`. Unary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    /// The operand of the unary expression.
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary expression, or lower precedence expressions (postfix and primary
    /// expressions) if there is no prefix operator.
    ///
    /// Exponentiation binds tighter than a prefix operator, so `-x**2` is `-(x**2)`.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let Some(kind) = input.peek_kind().and_then(UnaryOpKind::from_token) else {
            return Primary::parse_postfix(input);
        };

        let op_token = input.next_token()?;
        let operand = Self::parse_or_lower(input)?;
        let operand = Binary::parse_expr(input, operand, Precedence::Exp)?;
        Ok(Expr::Unary(Unary {
            span: op_token.span.start..operand.span().end,
            operand: Box::new(operand),
            op: UnaryOp {
                kind,
                span: op_token.span,
            },
        }))
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.kind, self.operand)
    }
}
