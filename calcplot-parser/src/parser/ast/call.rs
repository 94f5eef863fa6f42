use crate::{
    parser::{
        ast::{expr::Expr, paren::close_paren},
        error::Error,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A function call, such as `sin(x)`.
///
/// The callee is any expression the parser could attach an argument list to, such as the `sin`
/// in `sin(x)`, or the `os.system` in `os.system('ls')`. Whether calling it is allowed is not the
/// parser's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The expression being called.
    pub callee: Box<Expr>,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns a set of two spans, where the first is the span of the callee (with the opening
    /// parenthesis) and the second is the span of the closing parenthesis.
    pub fn outer_span(&self) -> [Range<usize>; 2] {
        [
            self.span.start..self.paren_span.start + 1,
            self.paren_span.end - 1..self.paren_span.end,
        ]
    }

    /// Parses the argument list that follows `callee`, which has already been parsed.
    pub fn parse_args(input: &mut Parser, callee: Expr) -> Result<Self, Error> {
        let open = input.expect(TokenKind::OpenParen, &[TokenKind::OpenParen])?;
        let mut args = Vec::new();

        let close_span = match input.eat(TokenKind::CloseParen) {
            Some(close) => close.span,
            None => loop {
                args.push(Expr::parse(input)?);
                if input.eat(TokenKind::Comma).is_none() {
                    break close_paren(input, &open.span)?;
                }
            },
        };

        Ok(Self {
            span: callee.span().start..close_span.end,
            callee: Box::new(callee),
            args,
            paren_span: open.span.start..close_span.end,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee)?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                write!(f, "{}, ", arg)?;
            }
            last.fmt(f)?;
        }
        write!(f, ")")
    }
}
