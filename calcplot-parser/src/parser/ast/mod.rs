//! The nodes of the syntax tree produced by the [`Parser`](super::Parser).
//!
//! The tree is a closed set of variants (see [`expr::Expr`]). Consumers that walk the tree match
//! on it exhaustively, so adding a node kind forces every walker to decide what to do with it.

pub mod assign;
pub mod binary;
pub mod call;
pub mod expr;
pub mod index;
pub mod literal;
pub mod member;
pub mod paren;
pub mod unary;
