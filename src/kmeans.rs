use crate::algorithm::{best_of_restarts, nearest, Run};
use crate::config::KMeansConfig;
use crate::distance::{Euclidean, Metric, Vector};
use crate::error::KMeansError;
use crate::rng::Sfc32;
use rand::RngCore;

/// An input item together with its position in the input slice
#[derive(Debug, PartialEq)]
pub struct Point<'a, T> {
    pub item: &'a T,
    pub index: usize,
}

impl<T> Clone for Point<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Point<'_, T> {}

/// One cluster of the final partition
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterEntry<'a, T> {
    /// Value representing the cluster center
    pub centroid: T,

    /// Members of the cluster, in input order
    pub cluster: Vec<Point<'a, T>>,

    /// Sum of squared distances from `centroid` to every member
    pub sum_of_squared_error: f64,
}

/// Total sum of squared error of a clustering result
pub fn total_sum_of_squared_error<T>(entries: &[ClusterEntry<'_, T>]) -> f64 {
    entries
        .iter()
        .fold(0.0, |acc, entry| acc + entry.sum_of_squared_error)
}

/// Cluster `data` with K-Means++ using the generator seeded from `config.seed`.
///
/// See [`kmeans_with_rng`] for the full contract.
///
/// ```
/// use kmeanspp_rs::{kmeans, Euclidean, KMeansConfig};
///
/// let data = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![9.0, 9.0], vec![9.0, 8.0]];
/// let result = kmeans(&data, &KMeansConfig::new(2), &Euclidean).unwrap();
/// assert_eq!(result.len(), 2);
/// ```
pub fn kmeans<'a, T, M>(
    data: &'a [T],
    config: &KMeansConfig,
    metric: &M,
) -> Result<Vec<ClusterEntry<'a, T>>, KMeansError>
where
    T: Clone,
    M: Metric<T>,
{
    let mut rng = Sfc32::from_words(config.seed);
    kmeans_with_rng(data, config, metric, &mut rng)
}

/// Cluster `data` with K-Means++, drawing randomness from `rng`.
///
/// Returns one entry per final centroid. Together the clusters hold every
/// input index exactly once, and none of them is empty. There are
/// `min(k, data.len())` entries unless the data has fewer distinct points
/// than that, in which case there is one entry per distinct point.
///
/// Empty data yields an empty result. Otherwise the checks below run in
/// order, each failing with its own error:
///
/// - `config.k` is `None`: [`KMeansError::Unsupported`]
/// - `config.k` is 0: [`KMeansError::InvalidParameter`]
/// - the metric rejects the items (e.g. ragged vectors): [`KMeansError::InvalidInput`]
/// - `config.restarts` is `Some(0)`: [`KMeansError::InvalidParameter`]
///
/// The same data, configuration and generator state always give the same result.
pub fn kmeans_with_rng<'a, T, M, R>(
    data: &'a [T],
    config: &KMeansConfig,
    metric: &M,
    rng: &mut R,
) -> Result<Vec<ClusterEntry<'a, T>>, KMeansError>
where
    T: Clone,
    M: Metric<T>,
    R: RngCore + ?Sized,
{
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let (k, restarts) = resolve_parameters(data, config, metric)?;
    let run = best_of_restarts(data, k, restarts, metric, rng, config.verbose);

    Ok(into_entries(run, data))
}

/// Validate the configuration against non-empty `data`; returns the clamped
/// k and the restart count.
fn resolve_parameters<T, M: Metric<T>>(
    data: &[T],
    config: &KMeansConfig,
    metric: &M,
) -> Result<(usize, usize), KMeansError> {
    let k = config.k.ok_or_else(|| {
        KMeansError::Unsupported("deriving k from the data is not implemented".to_string())
    })?;
    if k == 0 {
        return Err(KMeansError::InvalidParameter(
            "k must be greater than 0".to_string(),
        ));
    }

    metric.check_items(data)?;

    let restarts = config
        .restarts
        .unwrap_or_else(|| KMeansConfig::default_restarts(data.len()));
    if restarts == 0 {
        return Err(KMeansError::InvalidParameter(
            "restarts must be greater than 0".to_string(),
        ));
    }

    Ok((k.min(data.len()), restarts))
}

fn into_entries<T>(run: Run<T>, data: &[T]) -> Vec<ClusterEntry<'_, T>> {
    let Run {
        centroids,
        assignment,
        ..
    } = run;

    centroids
        .into_iter()
        .zip(assignment.clusters)
        .zip(assignment.sums_of_squared_error)
        .map(|((centroid, members), sum_of_squared_error)| ClusterEntry {
            centroid,
            cluster: members
                .into_iter()
                .map(|index| Point {
                    item: &data[index],
                    index,
                })
                .collect(),
            sum_of_squared_error,
        })
        .collect()
}

/// K-Means++ clustering model.
///
/// Holds a configuration and a metric, and remembers the centroids of the
/// last successful fit so that new items can be assigned with [`predict`](Self::predict).
///
/// # Example
///
/// ```
/// use kmeanspp_rs::KMeans;
///
/// let data = vec![
///     vec![0.0, 0.0],
///     vec![0.5, 0.0],
///     vec![10.0, 10.0],
///     vec![10.5, 10.0],
/// ];
///
/// let mut model = KMeans::new(2);
/// let clusters = model.fit(&data).unwrap();
/// assert_eq!(clusters.len(), 2);
///
/// let labels = model.predict(&[vec![0.2, 0.1], vec![9.9, 10.2]]).unwrap();
/// assert_ne!(labels[0], labels[1]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans<T, M = Euclidean> {
    /// Model configuration
    config: KMeansConfig,

    /// Distance and centroid policy
    metric: M,

    /// Centroids of the last fit (None if not yet fitted)
    centroids: Option<Vec<T>>,
}

impl<T: Vector> KMeans<T, Euclidean> {
    /// Create a Euclidean model with `k` clusters and default configuration.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k), Euclidean)
    }
}

impl<T, M> KMeans<T, M>
where
    T: Clone,
    M: Metric<T>,
{
    /// Create a model with a custom configuration and metric.
    pub fn with_config(config: KMeansConfig, metric: M) -> Self {
        Self {
            config,
            metric,
            centroids: None,
        }
    }

    /// Create a model with `k` clusters and a custom metric.
    pub fn with_metric(k: usize, metric: M) -> Self {
        Self::with_config(KMeansConfig::new(k), metric)
    }

    /// Fit the model, using the generator seeded from the configuration.
    ///
    /// # Errors
    ///
    /// Same as [`kmeans_with_rng`]. On error the previous fit is kept.
    pub fn fit<'a>(&mut self, data: &'a [T]) -> Result<Vec<ClusterEntry<'a, T>>, KMeansError> {
        let mut rng = Sfc32::from_words(self.config.seed);
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit the model, drawing randomness from `rng`.
    ///
    /// Fitting empty data succeeds with no clusters and leaves the model unfitted.
    pub fn fit_with_rng<'a, R>(
        &mut self,
        data: &'a [T],
        rng: &mut R,
    ) -> Result<Vec<ClusterEntry<'a, T>>, KMeansError>
    where
        R: RngCore + ?Sized,
    {
        let entries = kmeans_with_rng(data, &self.config, &self.metric, rng)?;

        self.centroids = if entries.is_empty() {
            None
        } else {
            Some(entries.iter().map(|entry| entry.centroid.clone()).collect())
        };

        Ok(entries)
    }

    /// Index of the nearest fitted centroid for each item.
    ///
    /// Indices refer to the order of the entries returned by the last fit.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has not been fitted yet
    /// - The metric rejects the items alongside the fitted centroids
    pub fn predict(&self, data: &[T]) -> Result<Vec<usize>, KMeansError> {
        let centroids = self.centroids.as_deref().ok_or(KMeansError::NotFitted)?;
        self.metric.check_items(centroids.iter().chain(data))?;

        Ok(data
            .iter()
            .map(|item| nearest(centroids, item, &self.metric).0)
            .collect())
    }

    /// Fit the model and return the cluster index of every input item.
    pub fn fit_predict(&mut self, data: &[T]) -> Result<Vec<usize>, KMeansError> {
        if self.fit(data)?.is_empty() {
            return Ok(Vec::new());
        }
        self.predict(data)
    }

    /// Centroids of the last fit, or `None` if the model has not been fitted.
    pub fn centroids(&self) -> Option<&[T]> {
        self.centroids.as_deref()
    }

    /// Get the requested number of clusters.
    pub fn k(&self) -> Option<usize> {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Get the metric.
    pub fn metric(&self) -> &M {
        &self.metric
    }
}
