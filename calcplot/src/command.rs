//! Commands understood by the REPL.
//!
//! - `plot <expr> [from <a> to <b>]` plots an expression in `x`, over `[-10, 10]` by default;
//! - `points <xs> ; <ys>` plots comma-separated coordinate lists;
//! - anything else is calculated.

use crate::{Error, PlotRequest};

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Compute the value of an expression.
    Calculate(String),

    /// Draw a plot.
    Plot(PlotRequest),
}

/// If `line` starts with the keyword as a whole word, returns the rest of the line.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn parse_number(text: &str) -> Result<f64, Error> {
    let text = text.trim();
    text.parse().map_err(|_| Error::InvalidNumber { value: text.to_string() })
}

impl Command {
    /// Parses a line of input.
    pub fn parse(line: &str) -> Result<Command, Error> {
        let line = line.trim();

        if let Some(rest) = strip_keyword(line, "plot") {
            let request = match rest.rsplit_once(" from ") {
                Some((expr, range)) => {
                    let (start, end) = range.split_once(" to ")
                        .ok_or_else(|| Error::InvalidNumber { value: range.trim().to_string() })?;
                    PlotRequest::function_over(expr.trim(), parse_number(start)?, parse_number(end)?)
                },
                None => PlotRequest::function(rest),
            };
            return Ok(Command::Plot(request));
        }

        if let Some(rest) = strip_keyword(line, "points") {
            let (xs, ys) = rest.split_once(';').unwrap_or((rest, ""));
            return Ok(Command::Plot(PlotRequest::points(xs.trim(), ys.trim())));
        }

        Ok(Command::Calculate(line.to_string()))
    }
}
