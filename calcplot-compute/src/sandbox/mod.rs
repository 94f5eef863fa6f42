//! Whitelist validation of parsed expressions.
//!
//! The [`Sandbox`] parses a normalized expression and walks every node of the tree. A tree is
//! accepted only if it consists of number literals, the variable `x`, constants and calls of
//! functions from the [`SymbolTable`], and arithmetic. Everything else is reported, all at once,
//! as an [`UnsafeExpression`]. Nothing is ever repaired.

pub mod error;

use calcplot_error::{ErrorKind, Error};
use calcplot_parser::{
    parser::{
        ast::{
            call::Call,
            expr::Expr,
            literal::{LitSym, Literal},
        },
        Parser,
    },
    VARIABLE,
};
use crate::{eval::error::UnboundVariable, symbols::{Symbol, SymbolTable}};
use error::{
    Assignment,
    DynamicCallee,
    MemberAccess,
    NotAFunction,
    NotAValue,
    StringLiteral,
    Subscript,
    UnknownFunction,
    UnknownVariable,
};
use log::debug;
use std::{fmt, io, ops::Range};

/// An expression that failed to parse or contains forbidden constructs.
///
/// Holds one diagnostic per offending node, in source order of the post-order walk.
#[derive(Debug)]
pub struct UnsafeExpression {
    source: String,
    errors: Vec<Error>,
}

impl UnsafeExpression {
    /// Creates an unsafe expression error for the given source.
    pub fn new(source: impl Into<String>, errors: Vec<Error>) -> Self {
        Self { source: source.into(), errors }
    }

    /// The expression that was rejected.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The diagnostics explaining why the expression was rejected.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Returns true if any of the diagnostics is a `T`.
    pub fn contains<T: ErrorKind + 'static>(&self) -> bool {
        self.errors.iter().any(Error::is::<T>)
    }

    /// Returns the first diagnostic that is a `T`, if any.
    pub fn find<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.errors.iter().find_map(Error::downcast_ref::<T>)
    }

    /// Reports every diagnostic to stderr.
    pub fn report_to_stderr(&self, src_id: &str) -> io::Result<()> {
        for error in &self.errors {
            error.report_to_stderr(src_id, &self.source)?;
        }
        Ok(())
    }

    /// Renders every diagnostic into a single string, including any color codes.
    pub fn report_to_string(&self, src_id: &str) -> io::Result<String> {
        let mut out = String::new();
        for error in &self.errors {
            out.push_str(&error.report_to_string(src_id, &self.source)?);
        }
        Ok(out)
    }
}

impl fmt::Display for UnsafeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsafe expression `{}`: ", self.source)?;
        let messages = self.errors.iter().map(ToString::to_string).collect::<Vec<_>>();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for UnsafeExpression {}

/// The syntax tree of an expression that passed the sandbox.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTree {
    /// The expression the tree was parsed from.
    source: String,

    /// The root of the tree.
    expr: Expr,

    /// Where the variable occurs in the source.
    variable_spans: Vec<Range<usize>>,

    /// The tree printed with canonical names.
    engine_source: String,
}

impl ValidatedTree {
    /// The expression the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root of the tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The spans at which the variable `x` occurs.
    pub fn variable_spans(&self) -> &[Range<usize>] {
        &self.variable_spans
    }

    /// Returns true if the expression mentions `x`.
    pub fn mentions_variable(&self) -> bool {
        !self.variable_spans.is_empty()
    }

    /// Rejects the tree if it mentions `x`, which has no value when computing a single number.
    pub fn require_closed(self) -> Result<Self, UnsafeExpression> {
        if !self.mentions_variable() {
            return Ok(self);
        }

        let errors = self.variable_spans
            .iter()
            .map(|span| Error::new(vec![span.clone()], UnboundVariable {
                name: VARIABLE.to_string(),
            }))
            .collect();
        Err(UnsafeExpression::new(self.source, errors))
    }

    /// Returns the expression with every alias replaced by its canonical Latin name, for use by
    /// the external computation engine.
    pub fn to_engine_source(&self) -> String {
        self.engine_source.clone()
    }
}

/// Replaces every symbol in the tree with its canonical name.
fn canonicalize(expr: &mut Expr, table: &SymbolTable) {
    match expr {
        Expr::Literal(Literal::Symbol(sym)) => {
            if let Some(canonical) = table.canonical_name(&sym.name) {
                sym.name = canonical.to_string();
            }
        },
        Expr::Literal(_) => (),
        Expr::Paren(paren) => canonicalize(&mut paren.expr, table),
        Expr::Call(call) => {
            canonicalize(&mut call.callee, table);
            for arg in &mut call.args {
                canonicalize(arg, table);
            }
        },
        Expr::Unary(unary) => canonicalize(&mut unary.operand, table),
        Expr::Binary(binary) => {
            canonicalize(&mut binary.lhs, table);
            canonicalize(&mut binary.rhs, table);
        },
        // rejected before a tree is ever canonicalized
        Expr::Member(_) | Expr::Index(_) | Expr::Assign(_) => (),
    }
}

/// Validates expressions against a [`SymbolTable`].
#[derive(Debug, Clone, Copy)]
pub struct Sandbox<'a> {
    table: &'a SymbolTable,
}

impl<'a> Sandbox<'a> {
    /// Creates a sandbox that allows the symbols of the given table.
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    /// Checks the callee of a call.
    fn check_call(&self, call: &Call) -> Option<Error> {
        let Expr::Literal(Literal::Symbol(callee)) = &*call.callee else {
            return Some(Error::new(vec![call.callee.span()], DynamicCallee));
        };

        let span = vec![callee.span.clone()];
        match self.table.get(&callee.name) {
            Some(Symbol::Function(_)) => None,
            _ if callee.name == VARIABLE => Some(Error::new(span, NotAFunction {
                name: callee.name.clone(),
            })),
            Some(Symbol::Constant { .. }) => Some(Error::new(span, NotAFunction {
                name: callee.name.clone(),
            })),
            None => Some(Error::new(span, UnknownFunction {
                name: callee.name.clone(),
                suggestions: self.table.similar_functions(&callee.name),
            })),
        }
    }

    /// Checks a symbol used as a value.
    fn check_value(&self, sym: &LitSym, variable_spans: &mut Vec<Range<usize>>) -> Option<Error> {
        if sym.name == VARIABLE {
            variable_spans.push(sym.span.clone());
            return None;
        }

        let span = vec![sym.span.clone()];
        match self.table.get(&sym.name) {
            Some(Symbol::Constant { .. }) => None,
            Some(Symbol::Function(_)) => Some(Error::new(span, NotAValue {
                name: sym.name.clone(),
            })),
            None => Some(Error::new(span, UnknownVariable {
                name: sym.name.clone(),
                suggestions: self.table.similar_values(&sym.name),
            })),
        }
    }

    /// Parses and validates an expression.
    pub fn validate(&self, source: &str) -> Result<ValidatedTree, UnsafeExpression> {
        let expr = Parser::new(source)
            .try_parse_full::<Expr>()
            .map_err(|err| {
                debug!("could not parse `{}`: {}", source, err);
                UnsafeExpression::new(source, vec![err])
            })?;

        let callees = expr.post_order_iter()
            .filter_map(|node| match node {
                Expr::Call(call) => Some(call.callee.span()),
                _ => None,
            })
            .collect::<Vec<_>>();

        let mut errors = Vec::new();
        let mut variable_spans = Vec::new();
        for node in expr.post_order_iter() {
            let error = match node {
                Expr::Literal(Literal::Number(_))
                    | Expr::Paren(_)
                    | Expr::Unary(_)
                    | Expr::Binary(_) => None,
                Expr::Literal(Literal::Symbol(sym)) if callees.contains(&sym.span) => None,
                Expr::Literal(Literal::Symbol(sym)) => self.check_value(sym, &mut variable_spans),
                Expr::Literal(Literal::Str(string)) => {
                    Some(Error::new(vec![string.span.clone()], StringLiteral))
                },
                Expr::Call(call) => self.check_call(call),
                Expr::Member(member) => Some(Error::new(vec![member.span()], MemberAccess {
                    member: member.member.name.clone(),
                })),
                Expr::Index(index) => Some(Error::new(vec![index.span()], Subscript)),
                Expr::Assign(assign) => Some(Error::new(vec![assign.span()], Assignment)),
            };
            errors.extend(error);
        }

        if !errors.is_empty() {
            debug!("rejected `{}` with {} issue(s)", source, errors.len());
            return Err(UnsafeExpression::new(source, errors));
        }

        let mut canonical = expr.clone();
        canonicalize(&mut canonical, self.table);
        debug!("validated `{}`", source);

        Ok(ValidatedTree {
            source: source.to_string(),
            expr,
            variable_spans,
            engine_source: canonical.to_string(),
        })
    }
}
