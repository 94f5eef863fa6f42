use thiserror::Error;

/// The number of samples used to plot a function, unless configured otherwise.
pub const DEFAULT_SAMPLES: usize = 500;

/// Why a [`SampleDomain`] could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidDomain {
    #[error("the range bounds must be finite numbers, got [{start}, {end}]")]
    NonFinite { start: f64, end: f64 },

    #[error("the start of the range ({start}) must be less than its end ({end})")]
    Empty { start: f64, end: f64 },

    #[error("at least 2 samples are needed, got {0}")]
    TooFewSamples(usize),
}

/// `N` evenly spaced points over `[start, end]`, including both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDomain {
    start: f64,
    end: f64,
    samples: usize,
}

impl SampleDomain {
    /// Creates a domain of `samples` points from `start` to `end`.
    pub fn new(start: f64, end: f64, samples: usize) -> Result<Self, InvalidDomain> {
        if !start.is_finite() || !end.is_finite() {
            return Err(InvalidDomain::NonFinite { start, end });
        }
        if start >= end {
            return Err(InvalidDomain::Empty { start, end });
        }
        if samples < 2 {
            return Err(InvalidDomain::TooFewSamples(samples));
        }
        Ok(Self { start, end, samples })
    }

    /// Creates a domain with [`DEFAULT_SAMPLES`] points.
    pub fn with_default_samples(start: f64, end: f64) -> Result<Self, InvalidDomain> {
        Self::new(start, end, DEFAULT_SAMPLES)
    }

    /// The first point.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// The last point.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// The number of points.
    pub fn len(&self) -> usize {
        self.samples
    }

    /// Always false; a domain has at least two points.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the `i`th point. The last point is exactly `end`.
    pub fn point(&self, i: usize) -> f64 {
        if i + 1 >= self.samples {
            return self.end;
        }
        let intervals = (self.samples - 1) as f64;
        let width = self.end - self.start;
        if width.is_finite() {
            self.start + width / intervals * i as f64
        } else {
            // `end - start` overflows, so weigh the ends instead
            let t = i as f64 / intervals;
            self.start * (1.0 - t) + self.end * t
        }
    }

    /// Returns every point, in increasing order.
    pub fn points(&self) -> Vec<f64> {
        (0..self.samples).map(|i| self.point(i)).collect()
    }
}
