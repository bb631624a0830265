//! # kmeanspp-rs
//!
//! Generic K-Means++ clustering with deterministic seeding and multiple restarts.
//!
//! ## Features
//!
//! - **K-Means++ seeding**: initial centroids are drawn with probability
//!   weighted by their distance to the centroids already chosen
//! - **Fixed-point refinement**: assignment and centroid updates repeat until
//!   cluster membership stops changing, replacing centroids that lose all items
//! - **Restarts**: several independent runs, keeping the one with the lowest
//!   total sum of squared error
//! - **Generic items**: any type works given a [`Metric`]; numeric vectors
//!   (`Vec<f64>`, `[f64; N]`, `ndarray::Array1<f64>`) use [`Euclidean`] out of the box
//! - **Reproducible**: the built-in [`Sfc32`] generator makes every run
//!   deterministic under a seed, and any `rand::RngCore` can be used instead
//!
//! ## Example
//!
//! ```rust
//! use kmeanspp_rs::{kmeans, Euclidean, KMeansConfig};
//!
//! let data = vec![
//!     vec![-10.0, 5.0, 100.0],
//!     vec![-11.0, 6.0, 101.0],
//!     vec![200.0, 12.0, -11.0],
//!     vec![205.0, 11.8, -10.8],
//! ];
//!
//! let result = kmeans(&data, &KMeansConfig::new(2), &Euclidean).unwrap();
//! assert_eq!(result.len(), 2);
//! for entry in &result {
//!     assert_eq!(entry.cluster.len(), 2);
//! }
//! ```
//!
//! ## Custom Items
//!
//! ```rust
//! use kmeanspp_rs::{kmeans, FnMetric, KMeansConfig};
//!
//! #[derive(Clone, Debug)]
//! struct Reading {
//!     celsius: f64,
//! }
//!
//! let metric = FnMetric::new(
//!     |a: &Reading, b: &Reading| (a.celsius - b.celsius).powi(2),
//!     |xs: &[&Reading]| Reading {
//!         celsius: xs.iter().map(|r| r.celsius).sum::<f64>() / xs.len() as f64,
//!     },
//! );
//!
//! let readings: Vec<Reading> = [20.1, 20.4, 35.0, 35.2]
//!     .iter()
//!     .map(|&celsius| Reading { celsius })
//!     .collect();
//!
//! let config = KMeansConfig::new(2).with_seed([1, 2, 3, 4]);
//! let result = kmeans(&readings, &config, &metric).unwrap();
//! assert_eq!(result.len(), 2);
//! ```

mod algorithm;
mod config;
mod distance;
mod error;
mod kmeans;
mod rng;
mod seeding;

pub use algorithm::{assign, Assignment};
pub use config::KMeansConfig;
pub use distance::{squared_euclidean, vector_mean, Euclidean, FnMetric, Metric, Vector};
pub use error::KMeansError;
pub use kmeans::{kmeans, kmeans_with_rng, total_sum_of_squared_error, ClusterEntry, KMeans, Point};
pub use rng::{unit_f64, Sfc32};
pub use seeding::plus_plus_init;
