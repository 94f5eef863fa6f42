use crate::{
    parser::{
        ast::{
            assign::Assign,
            binary::Binary,
            call::Call,
            index::Index,
            literal::{Literal, LITERAL_START},
            member::Member,
            paren::Paren,
            unary::Unary,
        },
        error::{Error, UnclosedParenthesis, UnexpectedEof, UnexpectedToken},
        iter::ExprIter,
        op::Precedence,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// The token kinds that can start a primary expression.
const PRIMARY_START: &[TokenKind] = &[
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Name,
    TokenKind::Str,
    TokenKind::OpenParen,
];

/// Represents a general expression.
///
/// An expression is any piece of input the parser can make sense of, whether or not it can be
/// evaluated. The sandbox decides which of these nodes are allowed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `sin(x)`.
    Call(Call),

    /// A member access, such as `x.real`.
    Member(Member),

    /// An index (subscript) expression, such as `x[0]`.
    Index(Index),

    /// A unary operation, such as `-1`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),

    /// An assignment, such as `x = 1`.
    Assign(Assign),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Member(member) => member.span(),
            Expr::Index(index) => index.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
            Expr::Assign(assign) => assign.span(),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_kind() == Some(TokenKind::CloseParen) {
            return Err(input.error(UnclosedParenthesis { opening: false }));
        }

        let lhs = Unary::parse_or_lower(input)?;
        let expr = Binary::parse_expr(input, lhs, Precedence::Any)?;

        if input.eat(TokenKind::Assign).is_some() {
            let value = Expr::parse(input)?;
            return Ok(Expr::Assign(Assign {
                span: expr.span().start..value.span().end,
                target: Box::new(expr),
                value: Box::new(value),
            }));
        }

        Ok(expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Member(member) => member.fmt(f),
            Expr::Index(index) => index.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
            Expr::Assign(assign) => assign.fmt(f),
        }
    }
}

/// Represents a primary expression.
///
/// Primary expressions are the simplest expressions, and are the building blocks of more complex
/// expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),
}

impl Primary {
    /// Returns the span of the primary expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Primary::Literal(literal) => literal.span(),
            Primary::Paren(paren) => paren.span(),
        }
    }

    /// Parses a primary expression followed by any number of postfix operations: calls `(..)`,
    /// member accesses `.name`, and subscripts `[..]`.
    pub fn parse_postfix(input: &mut Parser) -> Result<Expr, Error> {
        let mut expr: Expr = Primary::parse(input)?.into();

        loop {
            expr = match input.peek_kind() {
                Some(TokenKind::OpenParen) => Expr::Call(Call::parse_args(input, expr)?),
                Some(TokenKind::Dot) => Expr::Member(Member::parse_member(input, expr)?),
                Some(TokenKind::OpenSquare) => Expr::Index(Index::parse_index(input, expr)?),
                _ => break,
            };
        }

        Ok(expr)
    }
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let Some(token) = input.current_token() else {
            return Err(input.error(UnexpectedEof));
        };

        match token.kind {
            TokenKind::OpenParen => input.try_parse::<Paren>().map(Self::Paren),
            kind if LITERAL_START.contains(&kind) => input.try_parse::<Literal>().map(Self::Literal),
            TokenKind::CloseParen => Err(input.error(UnclosedParenthesis { opening: false })),
            found => Err(input.error(UnexpectedToken {
                expected: PRIMARY_START,
                found,
                lexeme: token.lexeme.to_string(),
            })),
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
        }
    }
}
