use calcplot_compute::UnsafeExpression;
use calcplot_engine::EngineError;
use calcplot_graph::PlotError;
use std::io;
use thiserror::Error;

/// The name reports refer to the user's input by.
const SRC_ID: &str = "input";

/// Everything that can go wrong while serving a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The request contained no expression or coordinates.
    #[error("the input is empty")]
    EmptyInput,

    /// A coordinate or range bound is not a number.
    #[error("`{value}` is not a number")]
    InvalidNumber { value: String },

    /// The expression failed to parse or was rejected by the sandbox.
    #[error(transparent)]
    Unsafe(#[from] UnsafeExpression),

    /// The expression could not be evaluated.
    #[error("could not evaluate `{expr}`: {error}")]
    Evaluation {
        expr: String,
        error: calcplot_error::Error,
    },

    /// The plot could not be produced.
    #[error(transparent)]
    Plot(#[from] PlotError),

    /// The external engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl Error {
    /// Report this error to stderr.
    ///
    /// Errors that point into the expression are rendered as [`ariadne`] reports highlighting the
    /// offending regions. Everything else is printed as a single line.
    ///
    /// [`ariadne`]: https://docs.rs/ariadne
    pub fn report_to_stderr(&self) -> io::Result<()> {
        match self {
            Self::Unsafe(err) | Self::Plot(PlotError::Unsafe(err)) => err.report_to_stderr(SRC_ID),
            Self::Evaluation { expr, error } | Self::Plot(PlotError::Evaluation { expr, error }) => {
                error.report_to_stderr(SRC_ID, expr)
            },
            _ => {
                eprintln!("error: {}", self);
                Ok(())
            },
        }
    }
}
