use calcplot_compute::{evaluate_pointwise, Sandbox, SampleDomain, SymbolTable, DEFAULT_SAMPLES};
use crate::{
    error::PlotError,
    plot::{GraphPoint, Plot, PlotOptions, Series},
    store::{Artifact, ArtifactStore},
};
use log::{debug, info};

/// Turns expressions and coordinate lists into plot images in an [`ArtifactStore`].
///
/// Every successful render writes exactly one new image, then asks the store to evict old images
/// beyond its capacity.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    /// The functions and constants function plots may use.
    table: &'a SymbolTable,

    /// Where images are written.
    store: ArtifactStore,

    /// Options every plot starts from before being fitted to its data.
    options: PlotOptions,

    /// The number of points a function is sampled at.
    samples: usize,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer writing to the given store, with default plot options and
    /// [`DEFAULT_SAMPLES`] samples per function plot.
    pub fn new(table: &'a SymbolTable, store: ArtifactStore) -> Self {
        Self {
            table,
            store,
            options: PlotOptions::default(),
            samples: DEFAULT_SAMPLES,
        }
    }

    /// Sets the plot options. Returns the renderer itself to allow chaining.
    pub fn with_options(mut self, options: PlotOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the number of samples per function plot. Returns the renderer itself to allow
    /// chaining.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// The store images are written to.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Samples `expr` over `[x_start, x_end]` and draws it as a line.
    ///
    /// The range is checked before the expression is parsed.
    pub fn render_function_plot(
        &self,
        expr: &str,
        x_start: f64,
        x_end: f64,
    ) -> Result<Artifact, PlotError> {
        let domain = SampleDomain::new(x_start, x_end, self.samples)?;
        let tree = Sandbox::new(self.table).validate(expr)?;
        let ys = evaluate_pointwise(&tree, self.table, &domain)
            .map_err(|error| PlotError::Evaluation { expr: expr.to_string(), error })?;
        debug!("sampled `{}` at {} points over [{}, {}]", expr, ys.len(), x_start, x_end);

        let points = domain.points()
            .into_iter()
            .zip(ys)
            .map(GraphPoint::from)
            .collect();
        let plot = Plot::new(format!("Function plot: {}", expr))
            .with_options(self.options)
            .with_series(Series::line(points))
            .fit();
        self.save(&plot)
    }

    /// Draws the points `(xs[i], ys[i])` as markers joined by a line, in the given order.
    pub fn render_point_plot(&self, xs: &[f64], ys: &[f64]) -> Result<Artifact, PlotError> {
        if xs.len() != ys.len() {
            return Err(PlotError::LengthMismatch { xs: xs.len(), ys: ys.len() });
        }
        if xs.len() < 2 {
            return Err(PlotError::TooFewPoints(xs.len()));
        }

        let points = xs.iter()
            .zip(ys)
            .map(|(&x, &y)| GraphPoint(x, y))
            .collect::<Vec<_>>();
        if let Some(index) = points.iter().position(|point| !point.is_finite()) {
            return Err(PlotError::NonFiniteCoordinate { index });
        }

        let plot = Plot::new("Point plot")
            .with_options(self.options)
            .with_series(Series::markers(points))
            .fit();
        self.save(&plot)
    }

    /// Writes the plot under a fresh name and enforces the store's capacity.
    fn save(&self, plot: &Plot) -> Result<Artifact, PlotError> {
        let path = self.store.fresh_path();
        plot.write_png(&path)?;
        info!("wrote plot {}", path.display());

        self.store.enforce_capacity();
        Ok(self.store.artifact(path))
    }
}

#[cfg(test)]
mod tests {
    use calcplot_compute::{domain::InvalidDomain, eval::error::DomainError};
    use pretty_assertions::assert_eq;
    use std::{
        fs::File,
        path::Path,
        time::{Duration, SystemTime},
    };
    use super::*;

    fn renderer(dir: &Path, max_files: usize) -> Renderer<'static> {
        let store = ArtifactStore::open(dir, max_files, "/static/plots/").unwrap();
        Renderer::new(SymbolTable::global(), store).with_samples(50)
    }

    fn png_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|entry| {
                entry.as_ref().unwrap().path().extension().map_or(false, |ext| ext == "png")
            })
            .count()
    }

    #[test]
    fn function_plot() {
        let tmp = tempfile::tempdir().unwrap();
        let artifact = renderer(tmp.path(), 20).render_function_plot("sin(x)", -10.0, 10.0).unwrap();

        assert!(artifact.path.starts_with(tmp.path()));
        assert!(artifact.url.starts_with("/static/plots/"));
        assert!(artifact.url.ends_with(".png"));

        // png signature
        let bytes = std::fs::read(&artifact.path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn range_checked_first() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = renderer(tmp.path(), 20);

        let err = renderer.render_function_plot("x**2", 5.0, 1.0).unwrap_err();
        assert!(matches!(err, PlotError::InvalidRange(InvalidDomain::Empty { .. })));

        // even an unsafe expression reports the range
        let err = renderer.render_function_plot("x.__class__", 1.0, 1.0).unwrap_err();
        assert!(matches!(err, PlotError::InvalidRange(_)));

        let err = renderer.render_function_plot("x", f64::NAN, 1.0).unwrap_err();
        assert!(matches!(err, PlotError::InvalidRange(InvalidDomain::NonFinite { .. })));
        assert_eq!(png_count(tmp.path()), 0);
    }

    #[test]
    fn unsafe_function() {
        let tmp = tempfile::tempdir().unwrap();
        let err = renderer(tmp.path(), 20)
            .render_function_plot("os.system('ls')", -1.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, PlotError::Unsafe(_)));
        assert_eq!(png_count(tmp.path()), 0);
    }

    #[test]
    fn evaluation_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let err = renderer(tmp.path(), 20)
            .render_function_plot("log(x)", -1.0, 1.0)
            .unwrap_err();
        match err {
            PlotError::Evaluation { expr, error } => {
                assert_eq!(expr, "log(x)");
                assert!(error.is::<DomainError>());
            },
            other => panic!("expected an evaluation error, got {:?}", other),
        }
        assert_eq!(png_count(tmp.path()), 0);
    }

    #[test]
    fn point_plot() {
        let tmp = tempfile::tempdir().unwrap();
        let artifact = renderer(tmp.path(), 20)
            .render_point_plot(&[1.0, 2.0, 3.0], &[1.0, 4.0, 9.0])
            .unwrap();
        assert!(artifact.path.exists());
    }

    #[test]
    fn point_plot_checks() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = renderer(tmp.path(), 20);

        let err = renderer.render_point_plot(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, PlotError::LengthMismatch { xs: 3, ys: 2 }));

        let err = renderer.render_point_plot(&[1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, PlotError::TooFewPoints(1)));

        let err = renderer.render_point_plot(&[1.0, 2.0, 3.0], &[1.0, f64::INFINITY, 2.0]).unwrap_err();
        assert!(matches!(err, PlotError::NonFiniteCoordinate { index: 1 }));
        assert_eq!(err.to_string(), "point #2 has a coordinate that is not a finite number");

        assert_eq!(png_count(tmp.path()), 0);
    }

    #[test]
    fn keeps_most_recent_max_files() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = renderer(tmp.path(), 3);
        let mut artifacts = Vec::new();
        for i in 0..5 {
            let ys = [0.0, i as f64];
            let artifact = renderer.render_point_plot(&[0.0, 1.0], &ys).unwrap();

            // distinct, increasing times, all older than the next render
            File::options()
                .write(true)
                .open(&artifact.path)
                .unwrap()
                .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(i + 1))
                .unwrap();
            artifacts.push(artifact);
        }

        assert_eq!(png_count(tmp.path()), 3);
        assert_eq!(renderer.store().list().unwrap(), artifacts[2..]);
        assert!(artifacts[..2].iter().all(|artifact| !artifact.path.exists()));
    }
}
