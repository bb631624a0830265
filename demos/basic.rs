//! Basic example demonstrating kmeanspp-rs usage
//!
//! Run with: RUST_LOG=info cargo run --example basic --release

use kmeanspp_rs::{total_sum_of_squared_error, unit_f64, KMeans, KMeansConfig, Sfc32};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== kmeanspp-rs example ===\n");

    // Generate synthetic data: 3 clusters in 2D for easy visualization
    let n_samples = 300;
    let n_clusters = 3;
    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];

    println!("Generating {} samples in 2 dimensions...", n_samples);

    let mut noise = Sfc32::new(2024, 1, 2, 3);
    let data: Vec<Vec<f64>> = (0..n_samples)
        .map(|i| {
            let center = centers[i % centers.len()];
            vec![
                center[0] + 2.0 * unit_f64(&mut noise) - 1.0,
                center[1] + 2.0 * unit_f64(&mut noise) - 1.0,
            ]
        })
        .collect();

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    // Configure and run K-Means++
    let config = KMeansConfig::new(n_clusters)
        .with_seed([42, 0, 0, 0])
        .with_verbose(true);

    println!("Running K-Means++ with k={}...\n", n_clusters);

    let mut model = KMeans::with_config(config, kmeanspp_rs::Euclidean);
    let clusters = model.fit(&data).expect("Clustering failed");

    println!("\nLearned clusters:");
    for (i, entry) in clusters.iter().enumerate() {
        println!(
            "  Cluster {}: centroid ({:.4}, {:.4}), {} samples, sse = {:.4}",
            i,
            entry.centroid[0],
            entry.centroid[1],
            entry.cluster.len(),
            entry.sum_of_squared_error
        );
    }
    println!("  Total sse: {:.4}\n", total_sum_of_squared_error(&clusters));

    // Assign a few new points
    let queries = vec![vec![-4.5, -5.5], vec![0.3, 4.2], vec![6.0, -4.0]];
    let labels = model.predict(&queries).expect("Prediction failed");

    println!("New point assignments:");
    for (query, label) in queries.iter().zip(&labels) {
        println!("  ({:.2}, {:.2}) -> Cluster {}", query[0], query[1], label);
    }

    println!("\n=== Done! ===");
}
