use super::point::{Bounds, CanvasPoint, GraphPoint};

/// Space in pixels between the canvas edges and the plotting area, where the title, tick numbers
/// and axis labels go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Frame {
    fn default() -> Frame {
        Frame {
            top: 50.0,
            right: 30.0,
            bottom: 60.0,
            left: 80.0,
        }
    }
}

/// Options to use when drawing a plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotOptions {
    /// The width and height of the canvas, in pixels.
    ///
    /// The default value is `(800, 600)`.
    pub canvas_size: CanvasPoint<u16>,

    /// The space around the plotting area.
    pub frame: Frame,

    /// The `(x, y)` point at the center of the plotting area.
    ///
    /// This field will automatically be computed when calling [`PlotOptions::fit`].
    ///
    /// The default value is `(0.0, 0.0)`.
    pub center: GraphPoint<f64>,

    /// The distance, in graph units, from the center of the plotting area to its edges.
    ///
    /// This field will automatically be computed when calling [`PlotOptions::fit`].
    ///
    /// The default value is `(10.0, 10.0)`.
    pub scale: GraphPoint<f64>,

    /// The fraction of the data's extent added as empty space on each side when fitting.
    ///
    /// The default value is `0.05`.
    pub margin: f64,

    /// The number of graph units between grid lines.
    ///
    /// This field will automatically be computed when calling [`PlotOptions::fit`].
    ///
    /// The default value is `(2.0, 2.0)`.
    pub grid_spacing: GraphPoint<f64>,

    /// The approximate number of grid divisions along each axis when fitting.
    ///
    /// The default value is `10`.
    pub grid_divisions: u8,

    /// The opacity of the grid lines, from `0.0` (invisible) to `1.0`.
    ///
    /// The default value is `0.6`.
    pub grid_opacity: f64,
}

impl Default for PlotOptions {
    fn default() -> PlotOptions {
        PlotOptions {
            canvas_size: CanvasPoint(800, 600),
            frame: Frame::default(),
            center: GraphPoint(0.0, 0.0),
            scale: GraphPoint(10.0, 10.0),
            margin: 0.05,
            grid_spacing: GraphPoint(2.0, 2.0),
            grid_divisions: 10,
            grid_opacity: 0.6,
        }
    }
}

/// Picks a grid step of the form 1, 2 or 5 times a power of ten, so that `range` is split into
/// about `divisions` parts.
pub fn nice_step(range: f64, divisions: u8) -> f64 {
    let raw = range / f64::from(divisions.max(1));
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }

    let base = 10f64.powf(raw.log10().floor());
    let fraction = raw / base;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Returns the multiples of `step` within `[lo, hi]`.
pub fn ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

impl PlotOptions {
    /// Set the canvas size. Returns an updated [`PlotOptions`] for chaining.
    pub fn canvas_size(mut self, width: u16, height: u16) -> Self {
        self.canvas_size = CanvasPoint(width, height);
        self
    }

    /// Centers and scales the view on the given bounds, leaving the configured margin on each
    /// side, and picks grid spacing for the new view.
    ///
    /// A degenerate axis (all points share one coordinate) gets a view one unit wide.
    pub fn fit(mut self, bounds: Bounds) -> Self {
        let fit_axis = |min: f64, max: f64| {
            let span = max - min;
            let span = if span > 0.0 { span } else { 1.0 };
            ((min + max) / 2.0, span / 2.0 + span * self.margin)
        };

        let (center_x, scale_x) = fit_axis(bounds.min.0, bounds.max.0);
        let (center_y, scale_y) = fit_axis(bounds.min.1, bounds.max.1);
        self.center = GraphPoint(center_x, center_y);
        self.scale = GraphPoint(scale_x, scale_y);
        self.grid_spacing = GraphPoint(
            nice_step(scale_x * 2.0, self.grid_divisions),
            nice_step(scale_y * 2.0, self.grid_divisions),
        );
        self
    }

    /// The visible range of graph x-values.
    pub fn x_range(&self) -> (f64, f64) {
        (self.center.0 - self.scale.0, self.center.0 + self.scale.0)
    }

    /// The visible range of graph y-values.
    pub fn y_range(&self) -> (f64, f64) {
        (self.center.1 - self.scale.1, self.center.1 + self.scale.1)
    }

    /// The width of the plotting area, in pixels.
    pub fn plot_width(&self) -> f64 {
        self.canvas_size.0 as f64 - self.frame.left - self.frame.right
    }

    /// The height of the plotting area, in pixels.
    pub fn plot_height(&self) -> f64 {
        self.canvas_size.1 as f64 - self.frame.top - self.frame.bottom
    }

    /// Converts an x-value in **graph** space to an x-value in **canvas** space.
    pub(crate) fn x_to_canvas(&self, x: f64) -> f64 {
        // 0.0 is the left edge of the plotting area, 1.0 the right edge
        let normalized = (x - self.center.0) / (self.scale.0 * 2.0) + 0.5;
        self.frame.left + normalized * self.plot_width()
    }

    /// Converts a y-value in **graph** space to a y-value in **canvas** space.
    pub(crate) fn y_to_canvas(&self, y: f64) -> f64 {
        // flipped, since canvas y grows downwards
        let normalized = 0.5 - (y - self.center.1) / (self.scale.1 * 2.0);
        self.frame.top + normalized * self.plot_height()
    }

    /// Converts a point in **graph** space to **canvas** space.
    pub fn to_canvas(&self, point: GraphPoint<f64>) -> CanvasPoint<f64> {
        CanvasPoint(
            self.x_to_canvas(point.0),
            self.y_to_canvas(point.1),
        )
    }
}
