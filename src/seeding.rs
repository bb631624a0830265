use crate::distance::Metric;
use crate::rng::unit_f64;
use rand::RngCore;
use tracing::trace;

/// Inverse-CDF draw over `weights`, skipping points that carry no weight.
///
/// Returns the first positive-weight index whose cumulative weight reaches the
/// threshold, or the last positive-weight index if rounding leaves the
/// threshold out of reach. `None` only when every weight is zero.
#[inline]
fn sample_by_weight<R: RngCore + ?Sized>(rng: &mut R, weights: &[f64], sum: f64) -> Option<usize> {
    let threshold = unit_f64(rng) * sum;
    let mut cumsum = 0.0;
    let mut chosen = None;

    for (i, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumsum += weight;
        chosen = Some(i);
        if cumsum >= threshold {
            break;
        }
    }

    chosen
}

/// Lower every point's weight to its distance from `centroid` where that is closer.
///
/// The weight is the *square* of the metric's squared distance, so sampling
/// follows the fourth power of the underlying distance.
fn tighten<T, M: Metric<T>>(weights: &mut [f64], data: &[T], centroid: &T, metric: &M) {
    for (weight, point) in weights.iter_mut().zip(data) {
        let distance = metric.squared_distance(centroid, point);
        let squared = distance * distance;
        if squared < *weight {
            *weight = squared;
        }
    }
}

/// K-Means++ seeding.
///
/// Extends `prefix` with items drawn from `data` until it holds `k` centroids.
/// With an empty prefix the first centroid is drawn uniformly. Each following
/// centroid is drawn with probability proportional to its weight against the
/// closest centroid chosen so far, which spreads centroids across the data.
///
/// Stops early, returning fewer than `k` centroids, once every point coincides
/// with a chosen centroid: there is nothing left that could own a cluster.
///
/// "Coincides" is judged on the weight, not on equality. Two distinct items
/// whose squared distance is below roughly `1e-162` get a weight that
/// underflows to `0.0`, so they count as one point and the result can hold
/// fewer than `min(k, distinct items)` centroids.
pub fn plus_plus_init<T, M, R>(
    data: &[T],
    k: usize,
    metric: &M,
    rng: &mut R,
    prefix: Vec<T>,
) -> Vec<T>
where
    T: Clone,
    M: Metric<T>,
    R: RngCore + ?Sized,
{
    let n = data.len();
    let mut centroids = prefix;
    if n == 0 {
        return centroids;
    }

    if centroids.is_empty() {
        let first = ((unit_f64(rng) * n as f64) as usize).min(n - 1);
        centroids.push(data[first].clone());
    }

    let mut weights = vec![f64::INFINITY; n];
    for centroid in &centroids {
        tighten(&mut weights, data, centroid, metric);
    }

    while centroids.len() < k {
        let sum: f64 = weights.iter().sum();
        if !(sum > 0.0) {
            trace!(
                chosen = centroids.len(),
                k,
                "no point left away from the chosen centroids"
            );
            break;
        }

        let Some(index) = sample_by_weight(rng, &weights, sum) else {
            break;
        };
        let picked = data[index].clone();
        tighten(&mut weights, data, &picked, metric);
        centroids.push(picked);
    }

    centroids
}
