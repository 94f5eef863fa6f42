//! The fixed vocabulary of functions and constants an expression may use.

use calcplot_parser::{normalize::Vocabulary, VARIABLE};
use levenshtein::levenshtein;
use once_cell::sync::Lazy;
use std::{collections::HashMap, f64::consts};

/// The process-wide standard symbol table.
static STANDARD: Lazy<SymbolTable> = Lazy::new(SymbolTable::standard);

/// The set of real inputs a function is defined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnDomain {
    /// Every real number.
    All,

    /// Strictly positive numbers, `x > 0`.
    Positive,

    /// Non-negative numbers, `x >= 0`.
    NonNegative,
}

impl FnDomain {
    /// Returns true if the function is defined at `x`.
    pub fn contains(self, x: f64) -> bool {
        match self {
            FnDomain::All => !x.is_nan(),
            FnDomain::Positive => x > 0.0,
            FnDomain::NonNegative => x >= 0.0,
        }
    }
}

impl std::fmt::Display for FnDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FnDomain::All => write!(f, "all real numbers"),
            FnDomain::Positive => write!(f, "x > 0"),
            FnDomain::NonNegative => write!(f, "x >= 0"),
        }
    }
}

/// A unary numeric function.
#[derive(Debug, Clone, Copy)]
pub struct Function {
    /// The Latin name of the function, used when re-emitting expressions for other tools.
    pub canonical: &'static str,

    /// The implementation.
    pub apply: fn(f64) -> f64,

    /// The inputs the function accepts.
    pub domain: FnDomain,
}

impl Function {
    /// The number of arguments every function takes.
    pub const ARITY: usize = 1;

    /// Applies the function to `arg`, returning [`None`] if `arg` is outside of its domain.
    pub fn call(&self, arg: f64) -> Option<f64> {
        self.domain.contains(arg).then(|| (self.apply)(arg))
    }
}

/// A named entry in a [`SymbolTable`].
#[derive(Debug, Clone, Copy)]
pub enum Symbol {
    /// A function that can be called with one argument.
    Function(Function),

    /// A numeric constant.
    Constant {
        /// The Latin name of the constant.
        canonical: &'static str,

        /// The value of the constant.
        value: f64,
    },
}

impl Symbol {
    /// Returns the Latin name of the symbol.
    pub fn canonical(&self) -> &'static str {
        match self {
            Symbol::Function(func) => func.canonical,
            Symbol::Constant { canonical, .. } => *canonical,
        }
    }
}

/// A fixed mapping from names (including localized aliases) to functions and constants.
///
/// The table is immutable once built. It is shared by reference between the normalizer, the
/// sandbox, and the evaluator.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Creates a table with no symbols at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the standard table: trigonometric functions, logarithms, `exp`, `sqrt`, `pi` and
    /// `e`, with their Ukrainian aliases.
    pub fn standard() -> Self {
        Self::empty()
            .with_function(&["sin", "син"], f64::sin, FnDomain::All)
            .with_function(&["cos", "кос"], f64::cos, FnDomain::All)
            .with_function(&["tan", "тан"], f64::tan, FnDomain::All)
            .with_function(&["log", "лог"], f64::ln, FnDomain::Positive)
            .with_function(&["log10", "лог10"], f64::log10, FnDomain::Positive)
            .with_function(&["exp"], f64::exp, FnDomain::All)
            .with_function(&["sqrt", "корінь"], f64::sqrt, FnDomain::NonNegative)
            .with_constant(&["pi"], consts::PI)
            .with_constant(&["e"], consts::E)
    }

    /// Returns the shared standard table, building it on first use.
    pub fn global() -> &'static SymbolTable {
        &STANDARD
    }

    /// Adds a function under each of the given names. The first name is the canonical one.
    pub fn with_function(
        mut self,
        names: &[&'static str],
        apply: fn(f64) -> f64,
        domain: FnDomain,
    ) -> Self {
        if let Some(&canonical) = names.first() {
            let func = Function { canonical, apply, domain };
            for name in names {
                self.symbols.insert(name.to_string(), Symbol::Function(func));
            }
        }
        self
    }

    /// Adds a constant under each of the given names. The first name is the canonical one.
    pub fn with_constant(mut self, names: &[&'static str], value: f64) -> Self {
        if let Some(&canonical) = names.first() {
            for name in names {
                self.symbols.insert(name.to_string(), Symbol::Constant { canonical, value });
            }
        }
        self
    }

    /// Looks up a name.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Looks up a function by name.
    pub fn function(&self, name: &str) -> Option<&Function> {
        match self.symbols.get(name)? {
            Symbol::Function(func) => Some(func),
            Symbol::Constant { .. } => None,
        }
    }

    /// Looks up the value of a constant by name.
    pub fn constant(&self, name: &str) -> Option<f64> {
        match self.symbols.get(name)? {
            Symbol::Constant { value, .. } => Some(*value),
            Symbol::Function(_) => None,
        }
    }

    /// Returns the Latin name for a name or alias.
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        self.symbols.get(name).map(Symbol::canonical)
    }

    /// Returns all function names similar to the given name, sorted.
    pub fn similar_functions(&self, name: &str) -> Vec<String> {
        similar(
            self.symbols
                .iter()
                .filter(|(_, symbol)| matches!(symbol, Symbol::Function(_)))
                .map(|(n, _)| n.as_str()),
            name,
        )
    }

    /// Returns all constant names similar to the given name, plus the variable if it is similar,
    /// sorted.
    pub fn similar_values(&self, name: &str) -> Vec<String> {
        similar(
            self.symbols
                .iter()
                .filter(|(_, symbol)| matches!(symbol, Symbol::Constant { .. }))
                .map(|(n, _)| n.as_str())
                .chain(std::iter::once(VARIABLE)),
            name,
        )
    }
}

/// Keeps the candidates within one edit of `name`.
fn similar<'a>(candidates: impl Iterator<Item = &'a str>, name: &str) -> Vec<String> {
    let mut found = candidates
        .filter(|candidate| *candidate != name && levenshtein(candidate, name) < 2)
        .map(str::to_string)
        .collect::<Vec<_>>();
    found.sort_unstable();
    found
}

impl Vocabulary for SymbolTable {
    fn is_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    fn is_value(&self, name: &str) -> bool {
        self.constant(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        assert_float_absolute_eq,
    };
    use calcplot_parser::normalize::normalize;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn aliases_share_implementation() {
        let table = SymbolTable::standard();
        let latin = table.function("sin").unwrap();
        let alias = table.function("син").unwrap();
        assert_eq!(latin.canonical, alias.canonical);
        assert_eq!(latin.domain, alias.domain);
        assert_eq!(table.canonical_name("корінь"), Some("sqrt"));
        assert_eq!(table.canonical_name("лог10"), Some("log10"));
        assert_eq!(table.canonical_name("nope"), None);
    }

    #[test]
    fn constants() {
        let table = SymbolTable::global();
        assert_float_absolute_eq!(table.constant("pi").unwrap(), std::f64::consts::PI);
        assert_float_absolute_eq!(table.constant("e").unwrap(), std::f64::consts::E);
        assert_eq!(table.constant("sin"), None);
        assert!(table.function("pi").is_none());
        assert!(matches!(table.get("e"), Some(Symbol::Constant { canonical: "e", .. })));
    }

    #[test]
    fn domains() {
        let table = SymbolTable::standard();
        assert_eq!(table.function("log").unwrap().call(0.0), None);
        assert_eq!(table.function("sqrt").unwrap().call(-1.0), None);
        assert_float_absolute_eq!(table.function("sqrt").unwrap().call(9.0).unwrap(), 3.0);
        assert_float_absolute_eq!(table.function("log10").unwrap().call(1000.0).unwrap(), 3.0);
        assert_float_absolute_eq!(table.function("тан").unwrap().call(0.0).unwrap(), 0.0);
    }

    #[test]
    fn suggestions() {
        let table = SymbolTable::standard();
        assert_eq!(table.similar_functions("sinn"), ["sin"]);
        assert_eq!(table.similar_functions("cot"), ["cos"]);
        assert_eq!(table.similar_values("pii"), ["pi"]);
        assert_eq!(table.similar_values("y"), ["e", "x"]);
        assert!(table.similar_functions("__import__").is_empty());
    }

    #[test]
    fn drives_normalizer() {
        let table = SymbolTable::global();
        assert_eq!(normalize("2xpi", table), "2*x*pi");
        assert_eq!(normalize("xsqrt(x)", table), "x*sqrt(x)");
        assert_eq!(normalize("лог10(х)", table), "лог10(x)");
    }
}
