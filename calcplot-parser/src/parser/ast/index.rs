use crate::{
    parser::{ast::expr::Expr, error::Error, Parse, Parser},
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// Indexing into a value, such as `list[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// The value being indexed.
    pub target: Box<Expr>,

    /// The index expression.
    pub index: Box<Expr>,

    /// The region of the source code that this index expression was parsed from.
    pub span: Range<usize>,
}

impl Index {
    /// Returns the span of the index expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the `[index]` that follows `target`, which has already been parsed.
    pub fn parse_index(input: &mut Parser, target: Expr) -> Result<Self, Error> {
        input.expect(TokenKind::OpenSquare, &[TokenKind::OpenSquare])?;
        let index = Expr::parse(input)?;
        let close = input.expect(TokenKind::CloseSquare, &[TokenKind::CloseSquare])?;
        Ok(Self {
            span: target.span().start..close.span.end,
            target: Box::new(target),
            index: Box::new(index),
        })
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.target, self.index)
    }
}
