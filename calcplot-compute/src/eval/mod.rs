//! Numeric evaluation of validated expressions with `f64` semantics.
//!
//! Evaluation refuses anything outside of arithmetic on its own, even though the sandbox should
//! already have rejected it: member accesses, subscripts, assignments, strings, and calls of
//! anything but a bare function name are [`UnsupportedNode`]s.

pub mod error;

use calcplot_parser::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            expr::Expr,
            literal::{LitSym, Literal},
            unary::Unary,
        },
        op::{BinOpKind, UnaryOpKind},
    },
    VARIABLE,
};
use crate::{domain::SampleDomain, sandbox::ValidatedTree, symbols::SymbolTable};
use error::{
    ArgumentCount,
    DivisionByZero,
    DomainError,
    Error,
    NonFiniteResult,
    UnboundVariable,
    UndefinedSymbol,
    UnsupportedNode,
};
use rayon::prelude::*;

/// A context to evaluate an expression in: the symbol table, and the value of `x`, if any.
#[derive(Debug, Clone, Copy)]
pub struct Ctxt<'a> {
    /// The functions and constants available.
    pub table: &'a SymbolTable,

    /// The value of the variable. [`None`] in scalar mode, where using `x` is an error.
    pub x: Option<f64>,
}

impl<'a> Ctxt<'a> {
    /// Creates a context where `x` has no value.
    pub fn scalar(table: &'a SymbolTable) -> Self {
        Self { table, x: None }
    }

    /// Creates a context where `x` is bound to the given value.
    pub fn at(table: &'a SymbolTable, x: f64) -> Self {
        Self { table, x: Some(x) }
    }
}

/// Any type that can be evaluated to produce a number.
pub trait Eval {
    /// Evaluate the expression to produce a number, using the given context.
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error>;
}

/// Returns the value if it is finite, or a [`NonFiniteResult`] error pointing at `span`.
fn finite(value: f64, span: std::ops::Range<usize>) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::new(vec![span], NonFiniteResult))
    }
}

impl Eval for LitSym {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        if self.name == VARIABLE {
            return ctxt.x.ok_or_else(|| Error::new(vec![self.span.clone()], UnboundVariable {
                name: self.name.clone(),
            }));
        }

        ctxt.table.constant(&self.name).ok_or_else(|| Error::new(vec![self.span.clone()], UndefinedSymbol {
            name: self.name.clone(),
        }))
    }
}

impl Eval for Literal {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        match self {
            Literal::Number(num) => Ok(num.value),
            Literal::Symbol(sym) => sym.eval(ctxt),
            Literal::Str(string) => Err(Error::new(vec![string.span.clone()], UnsupportedNode {
                node: "a string",
            })),
        }
    }
}

impl Eval for Unary {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        let operand = self.operand.eval(ctxt)?;
        Ok(match self.op.kind {
            UnaryOpKind::Neg => -operand,
            UnaryOpKind::Plus => operand,
        })
    }
}

impl Eval for Binary {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        let lhs = self.lhs.eval(ctxt)?;
        let rhs = self.rhs.eval(ctxt)?;

        let value = match self.op.kind {
            BinOpKind::Add => lhs + rhs,
            BinOpKind::Sub => lhs - rhs,
            BinOpKind::Mul => lhs * rhs,
            BinOpKind::Div => {
                if rhs == 0.0 {
                    return Err(Error::new(
                        vec![self.op.span.clone(), self.rhs.span()],
                        DivisionByZero,
                    ));
                }
                lhs / rhs
            },
            BinOpKind::Exp => lhs.powf(rhs),
        };

        finite(value, self.span())
    }
}

impl Eval for Call {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        let Expr::Literal(Literal::Symbol(callee)) = &*self.callee else {
            return Err(Error::new(vec![self.callee.span()], UnsupportedNode {
                node: "a call of something other than a function name",
            }));
        };

        let Some(func) = ctxt.table.function(&callee.name) else {
            return Err(Error::new(vec![callee.span.clone()], UndefinedSymbol {
                name: callee.name.clone(),
            }));
        };

        let [arg] = self.args.as_slice() else {
            return Err(Error::new(self.outer_span().to_vec(), ArgumentCount {
                name: callee.name.clone(),
                expected: 1,
                given: self.args.len(),
            }));
        };

        let value = arg.eval(ctxt)?;
        match func.call(value) {
            Some(result) => finite(result, self.span()),
            None => Err(Error::new(vec![callee.span.clone(), arg.span()], DomainError {
                name: callee.name.clone(),
                arg: value,
                domain: func.domain.to_string(),
            })),
        }
    }
}

impl Eval for Expr {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        match self {
            Expr::Literal(literal) => literal.eval(ctxt),
            Expr::Paren(paren) => paren.expr.eval(ctxt),
            Expr::Call(call) => call.eval(ctxt),
            Expr::Unary(unary) => unary.eval(ctxt),
            Expr::Binary(binary) => binary.eval(ctxt),
            Expr::Member(member) => Err(Error::new(vec![member.span()], UnsupportedNode {
                node: "a member access",
            })),
            Expr::Index(index) => Err(Error::new(vec![index.span()], UnsupportedNode {
                node: "a subscript",
            })),
            Expr::Assign(assign) => Err(Error::new(vec![assign.span()], UnsupportedNode {
                node: "an assignment",
            })),
        }
    }
}

/// Evaluates a tree to a single number. `x` has no value, so a tree that mentions it fails with
/// an [`UnboundVariable`] error.
pub fn evaluate_scalar(tree: &ValidatedTree, table: &SymbolTable) -> Result<f64, Error> {
    tree.expr().eval(&Ctxt::scalar(table))
}

/// Evaluates a tree once for each point of the domain, with `x` bound to the point.
///
/// Points are evaluated in parallel. If any point fails, the error of the first failing point
/// (in domain order) is returned and no values are.
pub fn evaluate_pointwise(
    tree: &ValidatedTree,
    table: &SymbolTable,
    domain: &SampleDomain,
) -> Result<Vec<f64>, Error> {
    let expr = tree.expr();
    let results = domain.points()
        .into_par_iter()
        .map(|x| expr.eval(&Ctxt::at(table, x)))
        .collect::<Vec<_>>();

    results.into_iter().collect()
}

/// Eval tests depend on the parser, so ensure that parser tests pass before running these.
#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        assert_float_absolute_eq,
    };
    use calcplot_parser::parser::Parser;
    use crate::sandbox::Sandbox;
    use pretty_assertions::assert_eq;
    use super::*;

    fn tree(source: &str) -> ValidatedTree {
        Sandbox::new(SymbolTable::global()).validate(source).unwrap()
    }

    fn scalar(source: &str) -> Result<f64, Error> {
        evaluate_scalar(&tree(source), SymbolTable::global())
    }

    /// Parses without the sandbox, to check that evaluation refuses unsafe nodes on its own.
    fn raw_eval(source: &str) -> Result<f64, Error> {
        let expr = Parser::new(source).try_parse_full::<Expr>().unwrap();
        expr.eval(&Ctxt::scalar(SymbolTable::global()))
    }

    #[test]
    fn arithmetic() {
        assert_eq!(scalar("1 + 2*3").unwrap(), 7.0);
        assert_eq!(scalar("((1 + 9)/5)*3").unwrap(), 6.0);
        assert_eq!(scalar("2**3**2").unwrap(), 512.0);
        assert_eq!(scalar("-2**2").unwrap(), -4.0);
        assert_eq!(scalar("8 - 4 - 2").unwrap(), 2.0);
        assert_eq!(scalar("+3").unwrap(), 3.0);
    }

    #[test]
    fn functions_and_constants() {
        assert_eq!(scalar("sin(0)").unwrap(), 0.0);
        assert_float_absolute_eq!(scalar("cos(pi)").unwrap(), -1.0);
        assert_float_absolute_eq!(scalar("log(e)").unwrap(), 1.0);
        assert_float_absolute_eq!(scalar("лог10(100)").unwrap(), 2.0);
        assert_float_absolute_eq!(scalar("корінь(16) + exp(0)").unwrap(), 5.0);
    }

    #[test]
    fn division_by_zero() {
        let err = scalar("1/(2 - 2)").unwrap_err();
        assert!(err.is::<DivisionByZero>());
        assert_eq!(err.spans, vec![1..2, 2..9]);
    }

    #[test]
    fn domain_errors() {
        let err = scalar("log(-1)").unwrap_err();
        let kind = err.downcast_ref::<DomainError>().unwrap();
        assert_eq!(kind.name, "log");
        assert_eq!(kind.arg, -1.0);
        assert!(scalar("sqrt(-4)").unwrap_err().is::<DomainError>());
        assert!(scalar("log10(0)").unwrap_err().is::<DomainError>());
    }

    #[test]
    fn non_finite_results() {
        assert!(scalar("0**-1").unwrap_err().is::<NonFiniteResult>());
        assert!(scalar("(-8)**0.5").unwrap_err().is::<NonFiniteResult>());
        assert!(scalar("exp(1000)").unwrap_err().is::<NonFiniteResult>());
        assert!(scalar("10**400").unwrap_err().is::<NonFiniteResult>());
    }

    #[test]
    fn argument_count() {
        let err = scalar("sin(1, 2)").unwrap_err();
        assert_eq!(err.downcast_ref(), Some(&ArgumentCount {
            name: "sin".to_string(),
            expected: 1,
            given: 2,
        }));
        assert!(scalar("cos()").unwrap_err().is::<ArgumentCount>());
    }

    #[test]
    fn scalar_x_is_unbound() {
        let err = scalar("2*x + 3").unwrap_err();
        assert!(err.is::<UnboundVariable>());
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn refuses_unsafe_nodes() {
        assert!(raw_eval("x.real").unwrap_err().is::<UnsupportedNode>());
        assert!(raw_eval("pi[0]").unwrap_err().is::<UnsupportedNode>());
        assert!(raw_eval("pi = 3").unwrap_err().is::<UnsupportedNode>());
        assert!(raw_eval("'abc'").unwrap_err().is::<UnsupportedNode>());
        assert!(raw_eval("(sin)(1)").unwrap_err().is::<UnsupportedNode>());
        assert!(raw_eval("open(1)").unwrap_err().is::<UndefinedSymbol>());
        assert!(raw_eval("sin").unwrap_err().is::<UndefinedSymbol>());
    }

    #[test]
    fn pointwise() {
        let domain = SampleDomain::new(1.0, 3.0, 3).unwrap();
        let values = evaluate_pointwise(&tree("x**2"), SymbolTable::global(), &domain).unwrap();
        assert_eq!(values, [1.0, 4.0, 9.0]);
    }

    #[test]
    fn pointwise_keeps_order() {
        let domain = SampleDomain::new(0.0, 1000.0, 1001).unwrap();
        let values = evaluate_pointwise(&tree("2*x + 1"), SymbolTable::global(), &domain).unwrap();
        assert_eq!(values.len(), 1001);
        assert!(values.iter().enumerate().all(|(i, &v)| v == 2.0 * i as f64 + 1.0));
    }

    #[test]
    fn pointwise_reports_first_failure() {
        let domain = SampleDomain::new(-2.0, 2.0, 5).unwrap();
        let err = evaluate_pointwise(&tree("sqrt(x)"), SymbolTable::global(), &domain).unwrap_err();
        assert_eq!(err.downcast_ref::<DomainError>().unwrap().arg, -2.0);

        let err = evaluate_pointwise(&tree("1/x"), SymbolTable::global(), &domain).unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }

    #[test]
    fn pointwise_over_widest_range() {
        let domain = SampleDomain::new(-1e308, 1e308, 9).unwrap();
        let values = evaluate_pointwise(&tree("sin(x)"), SymbolTable::global(), &domain).unwrap();
        assert_eq!(values.len(), 9);
        assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}
