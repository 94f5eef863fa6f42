use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::Error,
    op::{Associativity, BinOp, BinOpKind, Precedence},
    Parser,
};
use std::{fmt, ops::Range};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the binary operator at the cursor, without moving the cursor.
    fn peek_op(input: &Parser) -> Option<BinOpKind> {
        input.peek_kind().and_then(BinOpKind::from_token)
    }

    /// Parses binary operations whose operators have at least the given precedence, starting
    /// with the already-parsed left-hand side `lhs`.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        while let Some(kind) = Self::peek_op(input) {
            if kind.precedence() < precedence {
                break;
            }

            let op_token = input.next_token()?;
            let mut rhs = Unary::parse_or_lower(input)?;

            // before creating the `lhs op rhs` node, check the precedence of the following
            // operator, if any, so that `3 + 4 * 5` is parsed as `3 + (4 * 5)`
            while let Some(next) = Self::peek_op(input) {
                let binds_tighter = next.precedence() > kind.precedence()
                    || (next.precedence() == kind.precedence()
                        && next.associativity() == Associativity::Right);
                if !binds_tighter {
                    break;
                }
                rhs = Self::parse_expr(input, rhs, next.precedence())?;
            }

            let span = lhs.span().start..rhs.span().end;
            lhs = Expr::Binary(Binary {
                lhs: Box::new(lhs),
                op: BinOp {
                    kind,
                    span: op_token.span,
                },
                rhs: Box::new(rhs),
                span,
            });
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op.kind {
            BinOpKind::Add | BinOpKind::Sub => write!(f, "{} {} {}", self.lhs, self.op.kind, self.rhs),
            _ => write!(f, "{}{}{}", self.lhs, self.op.kind, self.rhs),
        }
    }
}
