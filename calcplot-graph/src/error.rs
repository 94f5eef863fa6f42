use calcplot_compute::{domain::InvalidDomain, UnsafeExpression};
use thiserror::Error;

/// Everything that can go wrong while producing a plot image.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The requested x-range is empty or not finite.
    #[error("invalid plot range: {0}")]
    InvalidRange(#[from] InvalidDomain),

    /// The x and y coordinate lists have different lengths.
    #[error("x has {xs} value(s) but y has {ys}")]
    LengthMismatch { xs: usize, ys: usize },

    /// Not enough points were given to draw a line.
    #[error("at least 2 points are needed, got {0}")]
    TooFewPoints(usize),

    /// A coordinate is infinite or NaN.
    #[error("point #{} has a coordinate that is not a finite number", .index + 1)]
    NonFiniteCoordinate { index: usize },

    /// The expression failed to parse or was rejected by the sandbox.
    #[error(transparent)]
    Unsafe(#[from] UnsafeExpression),

    /// The expression could not be evaluated at some point of the range.
    #[error("could not evaluate `{expr}`: {error}")]
    Evaluation {
        /// The expression, for reporting the error against.
        expr: String,

        /// The evaluation diagnostic.
        error: calcplot_error::Error,
    },

    /// Cairo failed to draw the image.
    #[error("could not render the plot: {0}")]
    Render(#[from] cairo::Error),

    /// The image could not be written to the artifact directory.
    #[error("could not write the plot image: {0}")]
    Write(#[from] cairo::IoError),
}
