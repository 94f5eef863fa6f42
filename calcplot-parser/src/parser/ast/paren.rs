use crate::{
    parser::{
        ast::expr::Expr,
        error::{EmptyParenthesis, Error, UnclosedParenthesis},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A parenthesized expression. A [`Paren`] can only contain a single expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this [`Paren`] was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// Consumes the closing parenthesis that matches the opening parenthesis at `open_span`. If the
/// input ends before it, the opening parenthesis is reported as unclosed.
pub(crate) fn close_paren(input: &mut Parser, open_span: &Range<usize>) -> Result<Range<usize>, Error> {
    if input.current_token().is_none() {
        return Err(Error::new(vec![open_span.clone()], UnclosedParenthesis { opening: true }));
    }
    input
        .expect(TokenKind::CloseParen, &[TokenKind::CloseParen])
        .map(|token| token.span)
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.expect(TokenKind::OpenParen, &[TokenKind::OpenParen])?;
        if let Some(close) = input.eat(TokenKind::CloseParen) {
            return Err(Error::new(vec![open.span.start..close.span.end], EmptyParenthesis));
        }

        let expr = Expr::parse(input)?;
        let close_span = close_paren(input, &open.span)?;
        Ok(Self {
            expr: Box::new(expr),
            span: open.span.start..close_span.end,
        })
    }
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.expr)
    }
}
