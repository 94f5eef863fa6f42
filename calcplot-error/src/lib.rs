//! Contains the common [`ErrorKind`] trait used by all diagnostics to display user-facing error
//! messages, and the span-carrying [`Error`] type that wraps them.
//!
//! A diagnostic can be shown in two ways: as an [`ariadne`] report that highlights the offending
//! regions of the expression, or as a plain one-line message through [`Display`](fmt::Display),
//! which is what gets written to log files.

// lets `#[derive(ErrorKind)]` refer to this crate by name in the tests below
extern crate self as calcplot_error;

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug}, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the kind as [`Any`], so callers can inspect the concrete diagnostic.
    fn as_any(&self) -> &dyn Any;

    /// The one-line summary of the error, without any highlighting.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns the concrete kind of this error, if it is a `T`.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Returns true if the kind of this error is a `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Report this error to stderr, highlighting the regions of `input` it originated from.
    ///
    /// The [`Report`] type does not implement [`Display`](fmt::Display), so it can only be
    /// written through its `eprint` and `write` methods.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }

    /// Render the report of this error into a string, including any color codes.
    pub fn report_to_string(&self, src_id: &str, input: &str) -> io::Result<String> {
        let mut buf = Vec::new();
        self.build_report(src_id).write((src_id, Source::from(input)), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use calcplot_attrs::ErrorKind;
    use super::*;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("the `{}` function does not exist", self.name),
        labels = ["this function"],
        help = "check the spelling",
    )]
    struct UnknownThing {
        name: String,
    }

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(message = "unexpected end of input")]
    struct Eof;

    #[test]
    fn plain_message() {
        let err = Error::new(vec![0..3], UnknownThing { name: "foo".to_string() });
        assert_eq!(err.to_string(), "the `foo` function does not exist");
    }

    #[test]
    fn downcast_kind() {
        let err = Error::new(vec![0..3], Eof);
        assert!(err.is::<Eof>());
        assert!(!err.is::<UnknownThing>());
        assert_eq!(err.downcast_ref::<Eof>(), Some(&Eof));
    }

    #[test]
    fn report_highlights_source() {
        let err = Error::new(vec![4..7], UnknownThing { name: "foo".to_string() });
        let report = err.report_to_string("input", "1 + foo(2)").unwrap();
        let plain = String::from_utf8_lossy(&strip_ansi_escapes::strip(report)).into_owned();

        assert!(plain.contains("the `foo` function does not exist"));
        assert!(plain.contains("this function"));
        assert!(plain.contains("check the spelling"));
    }

    #[test]
    fn report_without_spans() {
        let err = Error::new(Vec::new(), Eof);
        let report = err.report_to_string("input", "").unwrap();
        assert!(report.contains("unexpected end of input"));
    }
}
