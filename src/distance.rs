use crate::error::KMeansError;
use ndarray::Array1;

/// Distance and centroid policy used by the clustering engine.
///
/// The engine never looks inside items; everything it knows about them comes
/// through this trait. `squared_distance` must behave like a squared metric
/// (non-negative, zero on identical items) so that reassignment converges.
pub trait Metric<T> {
    /// Squared distance between two items
    fn squared_distance(&self, a: &T, b: &T) -> f64;

    /// Representative value for a group of items. `members` is never empty.
    fn centroid(&self, members: &[&T]) -> T;

    /// Reject inputs this policy cannot handle. Called once before clustering.
    fn check_items<'t, I>(&self, _items: I) -> Result<(), KMeansError>
    where
        I: IntoIterator<Item = &'t T>,
        T: 't,
    {
        Ok(())
    }
}

/// Fixed-length numeric vector understood by [`Euclidean`]
pub trait Vector: Clone {
    /// Number of coordinates
    fn dim(&self) -> usize;

    /// Coordinate `i`, with `i < self.dim()`
    fn coord(&self, i: usize) -> f64;

    /// Build a vector from exactly `dim` coordinates
    fn from_coords(coords: Vec<f64>) -> Self;
}

impl Vector for Vec<f64> {
    #[inline]
    fn dim(&self) -> usize {
        self.len()
    }

    #[inline]
    fn coord(&self, i: usize) -> f64 {
        self[i]
    }

    fn from_coords(coords: Vec<f64>) -> Self {
        coords
    }
}

impl<const N: usize> Vector for [f64; N] {
    #[inline]
    fn dim(&self) -> usize {
        N
    }

    #[inline]
    fn coord(&self, i: usize) -> f64 {
        self[i]
    }

    fn from_coords(coords: Vec<f64>) -> Self {
        std::array::from_fn(|i| coords[i])
    }
}

impl Vector for Array1<f64> {
    #[inline]
    fn dim(&self) -> usize {
        self.len()
    }

    #[inline]
    fn coord(&self, i: usize) -> f64 {
        self[i]
    }

    fn from_coords(coords: Vec<f64>) -> Self {
        Array1::from(coords)
    }
}

/// Squared Euclidean distance and coordinate-wise mean.
///
/// The default policy for numeric vectors. All vectors in one clustering call
/// must share the same length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

/// Sum of squared coordinate differences
///
/// # Panics
///
/// Panics if `b` has fewer coordinates than `a`. Extra coordinates in `b`
/// are ignored; [`Euclidean::check_items`] rejects both cases up front.
#[inline]
pub fn squared_euclidean<V: Vector>(a: &V, b: &V) -> f64 {
    let mut sum = 0.0;
    for i in 0..a.dim() {
        let diff = a.coord(i) - b.coord(i);
        sum += diff * diff;
    }
    sum
}

/// Coordinate-wise arithmetic mean of a non-empty group of vectors
///
/// # Panics
///
/// Panics if `members` is empty, or if a member is shorter than the first.
pub fn vector_mean<V: Vector>(members: &[&V]) -> V {
    let dim = members[0].dim();
    let n = members.len() as f64;
    let coords = (0..dim)
        .map(|i| members.iter().fold(0.0, |acc, v| acc + v.coord(i)) / n)
        .collect();
    V::from_coords(coords)
}

impl<V: Vector> Metric<V> for Euclidean {
    #[inline]
    fn squared_distance(&self, a: &V, b: &V) -> f64 {
        squared_euclidean(a, b)
    }

    fn centroid(&self, members: &[&V]) -> V {
        vector_mean(members)
    }

    fn check_items<'t, I>(&self, items: I) -> Result<(), KMeansError>
    where
        I: IntoIterator<Item = &'t V>,
        V: 't,
    {
        let mut items = items.into_iter().enumerate();
        let Some((_, first)) = items.next() else {
            return Ok(());
        };
        let expected = first.dim();
        for (index, item) in items {
            if item.dim() != expected {
                return Err(KMeansError::InvalidInput(format!(
                    "Every vector must have the same length: expected {}, got {} at index {}",
                    expected,
                    item.dim(),
                    index
                )));
            }
        }
        Ok(())
    }
}

/// Metric assembled from a distance closure and a centroid closure.
///
/// Required for items that are not numeric vectors.
///
/// ```
/// use kmeanspp_rs::{FnMetric, Metric};
///
/// let metric = FnMetric::new(
///     |a: &f64, b: &f64| (a - b) * (a - b),
///     |xs: &[&f64]| xs.iter().copied().sum::<f64>() / xs.len() as f64,
/// );
/// assert_eq!(metric.squared_distance(&1.0_f64, &4.0), 9.0);
/// ```
#[derive(Clone)]
pub struct FnMetric<D, C> {
    distance: D,
    centroid: C,
}

impl<D, C> FnMetric<D, C> {
    pub fn new(distance: D, centroid: C) -> Self {
        Self { distance, centroid }
    }
}

impl<T, D, C> Metric<T> for FnMetric<D, C>
where
    D: Fn(&T, &T) -> f64,
    C: Fn(&[&T]) -> T,
{
    #[inline]
    fn squared_distance(&self, a: &T, b: &T) -> f64 {
        (self.distance)(a, b)
    }

    fn centroid(&self, members: &[&T]) -> T {
        (self.centroid)(members)
    }
}
