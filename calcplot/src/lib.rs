//! A calculator and plotter for expressions in one variable, `x`.
//!
//! User input is first normalized (`2x` becomes `2*x`, `x^2` becomes `x**2`), then parsed and
//! checked against a fixed vocabulary of functions and constants before anything is evaluated.
//! The [`Calculator`] ties the pieces together into three flows:
//!
//! - [`Calculator::calculate`] evaluates an expression without `x` and runs it through the
//!   external computation engine;
//! - [`Calculator::plot_function`] samples an expression over a range of `x` and draws it;
//! - [`Calculator::plot_points`] draws comma-separated coordinate lists.

pub mod command;
pub mod config;
pub mod error;
pub mod logging;

use calcplot_compute::{evaluate_scalar, Sandbox, SymbolTable};
use calcplot_engine::Engine;
use calcplot_graph::{Artifact, ArtifactStore, PlotError, PlotOptions, Renderer};
use calcplot_parser::normalize::normalize;
use config::Config;
use log::{debug, error};
use std::io;

pub use error::Error;

/// The range of `x` a function is plotted over when none is given.
pub const DEFAULT_RANGE: (f64, f64) = (-10.0, 10.0);

/// A request to draw a plot.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotRequest {
    /// Plot an expression in `x` over `[x_start, x_end]`.
    Function {
        expr: String,
        x_start: f64,
        x_end: f64,
    },

    /// Plot comma-separated coordinate lists.
    Points {
        xs: String,
        ys: String,
    },
}

impl PlotRequest {
    /// A function plot over the default range.
    pub fn function(expr: impl Into<String>) -> Self {
        let (x_start, x_end) = DEFAULT_RANGE;
        PlotRequest::Function { expr: expr.into(), x_start, x_end }
    }

    /// A function plot over the given range.
    pub fn function_over(expr: impl Into<String>, x_start: f64, x_end: f64) -> Self {
        PlotRequest::Function { expr: expr.into(), x_start, x_end }
    }

    /// A point plot.
    pub fn points(xs: impl Into<String>, ys: impl Into<String>) -> Self {
        PlotRequest::Points { xs: xs.into(), ys: ys.into() }
    }
}

/// The result of [`Calculator::calculate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    /// The expression after normalization.
    pub normalized: String,

    /// The value computed locally.
    pub value: f64,

    /// The trimmed output of the external engine.
    pub engine_output: String,
}

/// Parses a comma-separated list of numbers. Whitespace around each number is ignored.
pub fn parse_csv(text: &str) -> Result<Vec<f64>, Error> {
    text.split(',')
        .map(str::trim)
        .map(|value| {
            value.parse::<f64>()
                .map_err(|_| Error::InvalidNumber { value: value.to_string() })
        })
        .collect()
}

/// Serves calculation and plot requests.
#[derive(Debug, Clone)]
pub struct Calculator<'a> {
    table: &'a SymbolTable,
    renderer: Renderer<'a>,
    engine: Engine,
}

impl Calculator<'static> {
    /// Creates a calculator with the standard vocabulary, set up from the configuration. The plot
    /// directory is created if it does not exist.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let table = SymbolTable::global();
        let store = ArtifactStore::open(
            &config.plots.dir,
            config.plots.max_files,
            config.plots.url_prefix.clone(),
        )?;
        let renderer = Renderer::new(table, store)
            .with_options(PlotOptions::default().canvas_size(config.plots.width, config.plots.height))
            .with_samples(config.plots.samples);
        let engine = Engine::new(config.engine.program.clone())
            .with_script(config.engine.script.clone())
            .with_timeout(config.engine.timeout());
        Ok(Calculator::new(table, renderer, engine))
    }
}

impl<'a> Calculator<'a> {
    /// Creates a calculator from its parts.
    pub fn new(table: &'a SymbolTable, renderer: Renderer<'a>, engine: Engine) -> Self {
        Self { table, renderer, engine }
    }

    /// Trims the input and normalizes it, rejecting empty input.
    fn normalize(&self, raw: &str) -> Result<String, Error> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::EmptyInput);
        }

        let normalized = normalize(raw, self.table);
        debug!("normalized `{}` to `{}`", raw, normalized);
        Ok(normalized)
    }

    /// Computes the value of an expression that does not mention `x`.
    ///
    /// The expression is evaluated locally first, so numeric faults such as division by zero are
    /// reported against the expression instead of by the engine.
    pub fn calculate(&self, raw: &str) -> Result<Calculation, Error> {
        let normalized = self.normalize(raw)?;
        let tree = Sandbox::new(self.table)
            .validate(&normalized)?
            .require_closed()?;

        let value = evaluate_scalar(&tree, self.table).map_err(|err| {
            error!("evaluation error in `{}`: {}", normalized, err);
            Error::Evaluation { expr: normalized.clone(), error: err }
        })?;
        debug!("`{}` evaluated to {}", normalized, value);

        let engine_output = self.engine.run(&tree.to_engine_source())?;
        Ok(Calculation { normalized, value, engine_output })
    }

    /// Plots an expression in `x` over `[x_start, x_end]`.
    pub fn plot_function(&self, raw: &str, x_start: f64, x_end: f64) -> Result<Artifact, Error> {
        let normalized = self.normalize(raw)?;
        self.renderer.render_function_plot(&normalized, x_start, x_end)
            .map_err(|err| {
                if let PlotError::Evaluation { expr, error } = &err {
                    error!("evaluation error in `{}`: {}", expr, error);
                }
                Error::Plot(err)
            })
    }

    /// Plots the points given as comma-separated x and y coordinates.
    pub fn plot_points(&self, x_csv: &str, y_csv: &str) -> Result<Artifact, Error> {
        if x_csv.trim().is_empty() || y_csv.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let xs = parse_csv(x_csv)?;
        let ys = parse_csv(y_csv)?;
        Ok(self.renderer.render_point_plot(&xs, &ys)?)
    }

    /// Serves a plot request.
    pub fn handle(&self, request: &PlotRequest) -> Result<Artifact, Error> {
        match request {
            PlotRequest::Function { expr, x_start, x_end } => {
                self.plot_function(expr, *x_start, *x_end)
            },
            PlotRequest::Points { xs, ys } => self.plot_points(xs, ys),
        }
    }
}

#[cfg(test)]
mod tests {
    use calcplot_compute::{
        eval::error::DivisionByZero,
        sandbox::error::UnknownFunction,
    };
    use calcplot_engine::EngineError;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use super::*;

    /// A calculator whose engine program does not exist, so every flow that reaches the engine
    /// fails with [`EngineError::NotFound`].
    fn calculator(dir: &Path) -> Calculator<'static> {
        let store = ArtifactStore::open(dir.join("plots"), 5, "/static/plots/").unwrap();
        let renderer = Renderer::new(SymbolTable::global(), store).with_samples(50);
        let engine = Engine::new(dir.join("no-such-engine").to_string_lossy())
            .with_script(dir.join("script.nbt"));
        Calculator::new(SymbolTable::global(), renderer, engine)
    }

    #[test]
    fn csv() {
        assert_eq!(parse_csv("1, 2,3").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(parse_csv(" -1.5 ").unwrap(), [-1.5]);
        assert!(matches!(
            parse_csv("1, a"),
            Err(Error::InvalidNumber { value }) if value == "a"
        ));
        assert!(matches!(
            parse_csv("1,,2"),
            Err(Error::InvalidNumber { value }) if value.is_empty()
        ));
    }

    #[test]
    fn default_range() {
        assert_eq!(PlotRequest::function("x"), PlotRequest::Function {
            expr: "x".to_string(),
            x_start: -10.0,
            x_end: 10.0,
        });
    }

    #[test]
    fn empty_input() {
        let tmp = tempfile::tempdir().unwrap();
        let calculator = calculator(tmp.path());
        assert!(matches!(calculator.calculate("   "), Err(Error::EmptyInput)));
        assert!(matches!(calculator.plot_function("", -1.0, 1.0), Err(Error::EmptyInput)));
        assert!(matches!(calculator.plot_points("1, 2", " "), Err(Error::EmptyInput)));
    }

    #[test]
    fn calculate_rejects_variable() {
        let tmp = tempfile::tempdir().unwrap();
        let Err(Error::Unsafe(err)) = calculator(tmp.path()).calculate("2x + 3") else {
            panic!("expected an unsafe expression");
        };
        assert_eq!(err.source(), "2*x + 3");
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].spans, vec![2..3]);
    }

    #[test]
    fn calculate_rejects_unknown_function() {
        let tmp = tempfile::tempdir().unwrap();
        let Err(Error::Unsafe(err)) = calculator(tmp.path()).calculate("sinn(1)") else {
            panic!("expected an unsafe expression");
        };
        assert!(err.contains::<UnknownFunction>());
    }

    #[test]
    fn calculate_catches_faults_locally() {
        let tmp = tempfile::tempdir().unwrap();
        let Err(Error::Evaluation { expr, error }) = calculator(tmp.path()).calculate("1/0") else {
            panic!("expected an evaluation error");
        };
        assert_eq!(expr, "1/0");
        assert!(error.is::<DivisionByZero>());
    }

    #[test]
    fn calculate_reaches_engine() {
        let tmp = tempfile::tempdir().unwrap();
        let err = calculator(tmp.path()).calculate("2(3)").unwrap_err();
        assert!(matches!(err, Error::Engine(EngineError::NotFound { .. })));

        // the canonical expression was handed to the engine
        let script = std::fs::read_to_string(tmp.path().join("script.nbt")).unwrap();
        assert_eq!(script, "let result = 2*(3)\nprint(result)");
    }

    #[test]
    fn function_plot() {
        let tmp = tempfile::tempdir().unwrap();
        let calculator = calculator(tmp.path());

        let artifact = calculator.handle(&PlotRequest::function("2x^2 - 1")).unwrap();
        assert!(artifact.path.exists());
        assert!(artifact.url.starts_with("/static/plots/"));

        let err = calculator.handle(&PlotRequest::function_over("x", 5.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::Plot(PlotError::InvalidRange(_))));

        let err = calculator.plot_function("x.__class__", -1.0, 1.0).unwrap_err();
        assert!(matches!(err, Error::Plot(PlotError::Unsafe(_))));
    }

    #[test]
    fn point_plot() {
        let tmp = tempfile::tempdir().unwrap();
        let calculator = calculator(tmp.path());

        let artifact = calculator.handle(&PlotRequest::points("1, 2,3", "1,4, 9")).unwrap();
        assert!(artifact.path.exists());

        let err = calculator.plot_points("1, 2, 3", "1, 2").unwrap_err();
        assert!(matches!(err, Error::Plot(PlotError::LengthMismatch { xs: 3, ys: 2 })));

        let err = calculator.plot_points("1, a", "1, 2").unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { value } if value == "a"));
    }
}
