//! Turns loose, user-typed math into a syntax tree.
//!
//! Input goes through two stages:
//!
//! 1. [`normalize`](normalize::normalize) rewrites shorthand notation (`2x`, `x^2`, decimal
//!    commas, Cyrillic look-alike letters) into a strict expression string. This never fails.
//! 2. [`Parser`](parser::Parser) tokenizes and parses the normalized string into an
//!    [`Expr`](parser::ast::expr::Expr) tree. The grammar is deliberately wider than what may be
//!    evaluated: member accesses, subscripts, string literals and assignments are parsed into
//!    their own nodes, so that the sandbox in `calcplot-compute` can reject them by kind.

pub mod normalize;
pub mod parser;
pub mod tokenizer;

/// The name of the only free variable an expression may mention.
pub const VARIABLE: &str = "x";
