use crate::{
    parser::{ast::{expr::Expr, literal::LitSym}, error::Error, Parser},
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// Accessing a member of a value, such as the `x.__class__` in `x.__class__.__bases__`.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The value whose member is accessed.
    pub target: Box<Expr>,

    /// The name of the member.
    pub member: LitSym,

    /// The region of the source code that this member access was parsed from.
    pub span: Range<usize>,
}

impl Member {
    /// Returns the span of the member access.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the `.name` that follows `target`, which has already been parsed.
    pub fn parse_member(input: &mut Parser, target: Expr) -> Result<Self, Error> {
        input.expect(TokenKind::Dot, &[TokenKind::Dot])?;
        let member = input.try_parse::<LitSym>()?;
        Ok(Self {
            span: target.span().start..member.span.end,
            target: Box::new(target),
            member,
        })
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.member)
    }
}
