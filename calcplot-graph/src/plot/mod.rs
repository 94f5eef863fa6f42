//! Two-dimensional line and scatter plots rendered with [`cairo`].
//!
//! To render an image, create a [`Plot`], add one or more [`Series`] to it, fit the view to the
//! data with [`Plot::fit`], then call [`Plot::draw`] to get an [`ImageSurface`], or
//! [`Plot::write_png`] to write it straight to a file.
//!
//! ```no_run
//! use calcplot_graph::plot::{Plot, Series};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let points = (0..=100)
//!     .map(|i| {
//!         let x = i as f64 / 10.0;
//!         (x, x.sin()).into()
//!     })
//!     .collect();
//!
//! Plot::new("Function plot: sin(x)")
//!     .with_series(Series::line(points))
//!     .fit()
//!     .write_png("sin.png")?;
//! # Ok(())
//! # }
//! ```

pub mod opts;
pub mod point;

use cairo::{Context, Error, FontSlant, FontWeight, Format, ImageSurface};
use crate::text_align::ShowTextAlign;
use std::{fs::File, path::Path};

pub use opts::PlotOptions;
pub use point::{Bounds, CanvasPoint, GraphPoint};

/// The color of a series, given as an RGB tuple with each value in the range 0.0 to 1.0.
pub type Color = (f64, f64, f64);

/// The default series color, a medium blue.
pub const SERIES_COLOR: Color = (0.12, 0.47, 0.71);

/// Formats a tick value with just enough decimals for the grid step.
fn format_tick(value: f64, step: f64) -> String {
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    let text = format!("{:.*}", decimals, value);
    // `-0` and `-0.00` read badly next to the origin
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// How the points of a series are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesStyle {
    /// Consecutive points joined by a line.
    Line,

    /// A marker on each point, with consecutive points joined by a line.
    LineWithMarkers,
}

/// A sequence of points drawn in one style and color.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// The points, in drawing order.
    pub points: Vec<GraphPoint<f64>>,

    /// How to draw the points.
    pub style: SeriesStyle,

    /// The color of the line and markers.
    pub color: Color,
}

impl Series {
    /// Creates a series drawn as a plain line.
    pub fn line(points: Vec<GraphPoint<f64>>) -> Series {
        Series { points, style: SeriesStyle::Line, color: SERIES_COLOR }
    }

    /// Creates a series drawn as markers joined by a line.
    pub fn markers(points: Vec<GraphPoint<f64>>) -> Series {
        Series { points, style: SeriesStyle::LineWithMarkers, color: SERIES_COLOR }
    }
}

/// A plot containing a title, axis labels and data series to draw.
///
/// See the [module-level documentation](self) for more information.
#[derive(Clone, Debug)]
pub struct Plot {
    /// The title drawn above the plotting area.
    pub title: String,

    /// The label of the horizontal axis.
    pub x_label: String,

    /// The label of the vertical axis.
    pub y_label: String,

    /// The data to draw.
    pub series: Vec<Series>,

    /// The rendering options for the plot.
    pub options: PlotOptions,
}

impl Plot {
    /// Creates an empty plot with the given title and axes labeled `x` and `y`.
    pub fn new(title: impl Into<String>) -> Plot {
        Plot {
            title: title.into(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            series: Vec::new(),
            options: PlotOptions::default(),
        }
    }

    /// Sets the rendering options.
    ///
    /// Returns the plot itself to allow chaining.
    pub fn with_options(mut self, options: PlotOptions) -> Plot {
        self.options = options;
        self
    }

    /// Adds a series.
    ///
    /// Returns the plot itself to allow chaining.
    pub fn with_series(mut self, series: Series) -> Plot {
        self.series.push(series);
        self
    }

    /// Returns the bounds of every finite point in the plot.
    pub fn bounds(&self) -> Option<Bounds> {
        self.series.iter()
            .filter_map(|series| Bounds::of(&series.points))
            .reduce(Bounds::union)
    }

    /// Centers and scales the view so that every point is visible.
    ///
    /// Returns the plot itself to allow chaining.
    pub fn fit(mut self) -> Plot {
        if let Some(bounds) = self.bounds() {
            self.options = self.options.fit(bounds);
        }
        self
    }

    /// Creates an [`ImageSurface`] with the plot's canvas size and draws the plot to it.
    pub fn draw(&self) -> Result<ImageSurface, Error> {
        let surface = ImageSurface::create(
            Format::ARgb32,
            self.options.canvas_size.0 as i32,
            self.options.canvas_size.1 as i32,
        )?;
        let context = Context::new(&surface)?;

        context.set_source_rgb(1.0, 1.0, 1.0);
        context.paint()?;
        context.select_font_face("sans-serif", FontSlant::Normal, FontWeight::Normal);

        self.draw_grid_lines(&context)?;
        self.draw_origin_axes(&context)?;
        self.draw_border(&context)?;
        self.draw_tick_numbers(&context)?;
        self.draw_labels(&context)?;

        // keep data inside the plotting area
        context.save()?;
        context.rectangle(
            self.options.frame.left,
            self.options.frame.top,
            self.options.plot_width(),
            self.options.plot_height(),
        );
        context.clip();
        self.draw_series(&context)?;
        context.restore()?;

        Ok(surface)
    }

    /// Draws the plot and writes it to the given path as a PNG image.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), cairo::IoError> {
        let surface = self.draw()?;
        let mut file = File::create(path)?;
        surface.write_to_png(&mut file)
    }

    /// Draw the grid lines.
    fn draw_grid_lines(&self, context: &Context) -> Result<(), Error> {
        let options = &self.options;
        context.set_source_rgba(0.7, 0.7, 0.7, options.grid_opacity);
        context.set_line_width(1.0);

        let (left, right) = options.x_range();
        for x in opts::ticks(left, right, options.grid_spacing.0) {
            let x_canvas = options.x_to_canvas(x);
            context.move_to(x_canvas, options.frame.top);
            context.line_to(x_canvas, options.frame.top + options.plot_height());
            context.stroke()?;
        }

        let (bottom, top) = options.y_range();
        for y in opts::ticks(bottom, top, options.grid_spacing.1) {
            let y_canvas = options.y_to_canvas(y);
            context.move_to(options.frame.left, y_canvas);
            context.line_to(options.frame.left + options.plot_width(), y_canvas);
            context.stroke()?;
        }

        Ok(())
    }

    /// Draw the origin axes if they are visible.
    fn draw_origin_axes(&self, context: &Context) -> Result<(), Error> {
        let options = &self.options;
        context.set_source_rgb(0.3, 0.3, 0.3);
        context.set_line_width(1.5);

        let (left, right) = options.x_range();
        if left <= 0.0 && 0.0 <= right {
            let x_canvas = options.x_to_canvas(0.0);
            context.move_to(x_canvas, options.frame.top);
            context.line_to(x_canvas, options.frame.top + options.plot_height());
            context.stroke()?;
        }

        let (bottom, top) = options.y_range();
        if bottom <= 0.0 && 0.0 <= top {
            let y_canvas = options.y_to_canvas(0.0);
            context.move_to(options.frame.left, y_canvas);
            context.line_to(options.frame.left + options.plot_width(), y_canvas);
            context.stroke()?;
        }

        Ok(())
    }

    /// Draw the border around the plotting area.
    fn draw_border(&self, context: &Context) -> Result<(), Error> {
        context.set_source_rgb(0.0, 0.0, 0.0);
        context.set_line_width(1.0);
        context.rectangle(
            self.options.frame.left,
            self.options.frame.top,
            self.options.plot_width(),
            self.options.plot_height(),
        );
        context.stroke()
    }

    /// Draw the tick numbers below and to the left of the plotting area.
    fn draw_tick_numbers(&self, context: &Context) -> Result<(), Error> {
        let options = &self.options;
        context.set_source_rgb(0.0, 0.0, 0.0);
        context.set_font_size(12.0);

        let padding = 6.0;
        let bottom_edge = options.frame.top + options.plot_height();

        let (left, right) = options.x_range();
        for x in opts::ticks(left, right, options.grid_spacing.0) {
            context.show_text_align(
                &format_tick(x, options.grid_spacing.0),
                (options.x_to_canvas(x), bottom_edge + padding),
                (0.5, 1.0),
            )?;
        }

        let (bottom, top) = options.y_range();
        for y in opts::ticks(bottom, top, options.grid_spacing.1) {
            context.show_text_align(
                &format_tick(y, options.grid_spacing.1),
                (options.frame.left - padding, options.y_to_canvas(y)),
                (1.0, 0.5),
            )?;
        }

        Ok(())
    }

    /// Draw the title and the axis labels.
    fn draw_labels(&self, context: &Context) -> Result<(), Error> {
        let options = &self.options;
        let center_x = options.frame.left + options.plot_width() / 2.0;
        let center_y = options.frame.top + options.plot_height() / 2.0;
        context.set_source_rgb(0.0, 0.0, 0.0);

        context.set_font_size(18.0);
        context.show_text_align(&self.title, (center_x, options.frame.top / 2.0), (0.5, 0.5))?;

        context.set_font_size(14.0);
        context.show_text_align(
            &self.x_label,
            (center_x, options.canvas_size.1 as f64 - 8.0),
            (0.5, 0.0),
        )?;

        // the y label reads bottom to top
        context.save()?;
        context.translate(16.0, center_y);
        context.rotate(-std::f64::consts::FRAC_PI_2);
        context.show_text_align(&self.y_label, (0.0, 0.0), (0.5, 1.0))?;
        context.restore()
    }

    /// Draw the data series.
    fn draw_series(&self, context: &Context) -> Result<(), Error> {
        context.set_line_width(2.0);

        for series in &self.series {
            let (r, g, b) = series.color;
            context.set_source_rgb(r, g, b);

            // non-finite points break the line instead of being drawn
            let mut pen_down = false;
            for point in &series.points {
                if !point.is_finite() {
                    pen_down = false;
                    continue;
                }

                let canvas = self.options.to_canvas(*point);
                if pen_down {
                    context.line_to(canvas.0, canvas.1);
                } else {
                    context.move_to(canvas.0, canvas.1);
                    pen_down = true;
                }
            }
            context.stroke()?;

            if series.style == SeriesStyle::LineWithMarkers {
                for point in series.points.iter().filter(|point| point.is_finite()) {
                    let canvas = self.options.to_canvas(*point);
                    context.new_sub_path();
                    context.arc(canvas.0, canvas.1, 4.0, 0.0, 2.0 * std::f64::consts::PI);
                }
                context.fill()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(2.0, 2.0), "2");
        assert_eq!(format_tick(0.30000000000000004, 0.1), "0.3");
        assert_eq!(format_tick(-0.0, 0.5), "0.0");
        assert_eq!(format_tick(-1e-17, 0.01), "0.00");
        assert_eq!(format_tick(-2.5, 0.5), "-2.5");
        assert_eq!(format_tick(1200.0, 200.0), "1200");
    }

    #[test]
    fn bounds_cover_every_series() {
        let plot = Plot::new("test")
            .with_series(Series::line(vec![GraphPoint(0.0, 0.0), GraphPoint(1.0, 5.0)]))
            .with_series(Series::markers(vec![GraphPoint(-2.0, 1.0)]));
        assert_eq!(plot.bounds(), Some(Bounds {
            min: GraphPoint(-2.0, 0.0),
            max: GraphPoint(1.0, 5.0),
        }));
        assert_eq!(Plot::new("empty").bounds(), None);
    }

    #[test]
    fn draws_at_canvas_size() {
        let surface = Plot::new("Point plot")
            .with_series(Series::markers(vec![GraphPoint(1.0, 2.0), GraphPoint(3.0, 4.0)]))
            .fit()
            .draw()
            .unwrap();
        assert_eq!((surface.width(), surface.height()), (800, 600));
    }
}
