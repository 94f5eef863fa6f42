/// A pair of `(x, y)` values in **graph** units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphPoint<T>(pub T, pub T);

impl<T> From<(T, T)> for GraphPoint<T> {
    fn from((x, y): (T, T)) -> GraphPoint<T> {
        GraphPoint(x, y)
    }
}

impl GraphPoint<f64> {
    /// Returns true if both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

/// A pair of `(x, y)` values in **canvas** units (pixels, with `y` growing downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasPoint<T>(pub T, pub T);

impl<T> From<(T, T)> for CanvasPoint<T> {
    fn from((x, y): (T, T)) -> CanvasPoint<T> {
        CanvasPoint(x, y)
    }
}

/// The smallest rectangle in graph space containing a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// The bottom-left corner.
    pub min: GraphPoint<f64>,

    /// The top-right corner.
    pub max: GraphPoint<f64>,
}

impl Bounds {
    /// Computes the bounds of the finite points in the iterator. Returns [`None`] if there are
    /// none.
    pub fn of<'a>(points: impl IntoIterator<Item = &'a GraphPoint<f64>>) -> Option<Bounds> {
        points.into_iter()
            .filter(|point| point.is_finite())
            .fold(None, |bounds: Option<Bounds>, point| Some(match bounds {
                None => Bounds { min: *point, max: *point },
                Some(Bounds { min, max }) => Bounds {
                    min: GraphPoint(min.0.min(point.0), min.1.min(point.1)),
                    max: GraphPoint(max.0.max(point.0), max.1.max(point.1)),
                },
            }))
    }

    /// Combines two bounds into one containing both.
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: GraphPoint(self.min.0.min(other.min.0), self.min.1.min(other.min.1)),
            max: GraphPoint(self.max.0.max(other.max.0), self.max.1.max(other.max.1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_skip_non_finite() {
        let points = [
            GraphPoint(1.0, -2.0),
            GraphPoint(f64::NAN, 100.0),
            GraphPoint(-3.0, 4.0),
            GraphPoint(0.0, f64::INFINITY),
        ];
        assert_eq!(Bounds::of(&points), Some(Bounds {
            min: GraphPoint(-3.0, -2.0),
            max: GraphPoint(1.0, 4.0),
        }));
        assert_eq!(Bounds::of(&Vec::<GraphPoint<f64>>::new()), None);
    }
}
