use approx::assert_relative_eq;
use kmeanspp_rs::{
    kmeans, kmeans_with_rng, squared_euclidean, total_sum_of_squared_error, unit_f64,
    ClusterEntry, Euclidean, FnMetric, KMeans, KMeansConfig, KMeansError, Metric, Sfc32,
};
use ndarray::{array, Array1};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Points scattered within ±0.5 around the corners of a 40x40 square,
/// interleaved so that item `i` belongs to group `i % 4`.
fn generate_square_groups(n_samples: usize, seed: u32) -> Vec<Vec<f64>> {
    let mut rng = Sfc32::new(seed, 0, 0, 0);
    let centers = [[0.0, 0.0], [40.0, 0.0], [0.0, 40.0], [40.0, 40.0]];

    (0..n_samples)
        .map(|i| {
            let center = centers[i % centers.len()];
            let x = center[0] + unit_f64(&mut rng) - 0.5;
            let y = center[1] + unit_f64(&mut rng) - 0.5;
            vec![x, y]
        })
        .collect()
}

/// Every input index appears in exactly one cluster and no cluster is empty
fn assert_partition<T>(entries: &[ClusterEntry<'_, T>], n: usize) {
    let mut seen = vec![false; n];
    for entry in entries {
        assert!(!entry.cluster.is_empty(), "clusters must not be empty");
        for point in &entry.cluster {
            assert!(point.index < n, "index out of range");
            assert!(!seen[point.index], "index {} assigned twice", point.index);
            seen[point.index] = true;
        }
    }
    assert!(seen.iter().all(|&s| s), "every index must be assigned");
}

fn mean(group: &[Vec<f64>]) -> Vec<f64> {
    (0..group[0].len())
        .map(|i| group.iter().fold(0.0, |acc, x| acc + x[i]) / group.len() as f64)
        .collect()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_input() {
    let data: Vec<Vec<f64>> = Vec::new();
    let result = kmeans(&data, &KMeansConfig::new(2), &Euclidean).unwrap();
    assert!(result.is_empty(), "Empty input should give an empty result");
}

#[test]
fn test_single_item() {
    let data = vec![vec![1.0, 2.0, 3.0]];
    let result = kmeans(&data, &KMeansConfig::new(1), &Euclidean).unwrap();

    assert_eq!(result.len(), 1, "Should return one group");
    assert_eq!(result[0].centroid, data[0], "Centroid should be the item");
    assert_eq!(result[0].cluster.len(), 1);
    assert_eq!(result[0].cluster[0].index, 0);
    assert!(std::ptr::eq(result[0].cluster[0].item, &data[0]));
    assert_eq!(result[0].sum_of_squared_error, 0.0);
}

#[test]
fn test_three_groups_in_3d() {
    let same_object = vec![41.0, -200.0, 561.0];
    let groups = vec![
        vec![
            vec![-10.0, 5.0, 100.0],
            vec![-11.0, 6.0, 101.0],
            vec![-10.5, 6.5, 102.0],
            vec![-9.5, 5.5, 103.0],
            vec![-9.75, 6.25, 104.0],
        ],
        vec![
            vec![200.0, 12.0, -11.0],
            vec![205.0, 11.8, -10.8],
            vec![202.0, 11.5, -10.0],
            vec![208.0, 11.0, -12.0],
            vec![198.0, 11.15, -11.0],
        ],
        vec![
            vec![40.0, -200.0, 568.0],
            vec![38.0, -190.0, 578.0],
            vec![39.5, -205.0, 556.0],
            same_object.clone(),
            same_object,
        ],
    ];
    let data: Vec<Vec<f64>> = groups.iter().flatten().cloned().collect();

    let mut result = kmeans(&data, &KMeansConfig::new(3), &Euclidean).unwrap();
    assert_eq!(result.len(), 3, "Should return three groups");

    result.sort_by_key(|entry| entry.cluster[0].index);
    let expected_sse = [12.9, 65.944, 417.0];

    for (g, entry) in result.iter().enumerate() {
        let indices: Vec<usize> = entry.cluster.iter().map(|p| p.index).collect();
        assert_eq!(indices, (g * 5..g * 5 + 5).collect::<Vec<_>>());
        for point in &entry.cluster {
            assert_eq!(point.item, &data[point.index]);
        }
        assert_eq!(entry.centroid, mean(&groups[g]));
        assert_relative_eq!(entry.sum_of_squared_error, expected_sse[g], epsilon = 1e-9);
    }
}

#[test]
fn test_k_greater_than_len_is_clamped() {
    let data = vec![vec![0.0], vec![1.0], vec![5.0]];
    let result = kmeans(&data, &KMeansConfig::new(10), &Euclidean).unwrap();

    assert_eq!(result.len(), 3, "k should be clamped to the data length");
    assert_partition(&result, data.len());
}

#[test]
fn test_k_equals_one_gives_mean() {
    let data = generate_square_groups(40, 3);
    let result = kmeans(&data, &KMeansConfig::new(1), &Euclidean).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].cluster.len(), data.len());
    assert_eq!(result[0].centroid, mean(&data));
}

// ============================================================================
// Correctness Tests
// ============================================================================

#[test]
fn test_well_separated_groups_are_recovered() {
    let data = generate_square_groups(100, 42);

    for seed in [[0, 0, 0, 0], [1, 2, 3, 4], [99, 98, 97, 96], [7, 7, 7, 7]] {
        let config = KMeansConfig::new(4).with_seed(seed);
        let result = kmeans(&data, &config, &Euclidean).unwrap();

        assert_eq!(result.len(), 4);
        for entry in &result {
            let group = entry.cluster[0].index % 4;
            assert!(
                entry.cluster.iter().all(|p| p.index % 4 == group),
                "cluster mixes groups for seed {:?}",
                seed
            );
            assert_eq!(entry.cluster.len(), 25);
        }
    }
}

#[test]
fn test_sum_of_squared_error_matches_members() {
    let data = generate_square_groups(60, 11);
    let result = kmeans(&data, &KMeansConfig::new(5), &Euclidean).unwrap();

    for entry in &result {
        let recomputed: f64 = entry
            .cluster
            .iter()
            .map(|p| squared_euclidean(&entry.centroid, p.item))
            .sum();
        assert_relative_eq!(entry.sum_of_squared_error, recomputed, epsilon = 1e-9);
    }

    let total: f64 = result.iter().map(|e| e.sum_of_squared_error).sum();
    assert_relative_eq!(total_sum_of_squared_error(&result), total, epsilon = 1e-9);
}

#[test]
fn test_result_is_a_fixed_point() {
    let data = generate_square_groups(80, 5);
    let result = kmeans(&data, &KMeansConfig::new(6), &Euclidean).unwrap();

    // Every member is closest to its own centroid (ties resolved to the earlier one)
    for (own, entry) in result.iter().enumerate() {
        for point in &entry.cluster {
            let own_distance = squared_euclidean(&entry.centroid, point.item);
            for (other, candidate) in result.iter().enumerate() {
                let distance = squared_euclidean(&candidate.centroid, point.item);
                if other < own {
                    assert!(distance > own_distance);
                } else {
                    assert!(distance >= own_distance);
                }
            }
        }
    }
}

#[test]
fn test_cluster_members_in_input_order() {
    let data = generate_square_groups(50, 8);
    let result = kmeans(&data, &KMeansConfig::new(4), &Euclidean).unwrap();

    for entry in &result {
        assert!(entry.cluster.windows(2).all(|w| w[0].index < w[1].index));
    }
}

#[test]
fn test_duplicate_points_limit_cluster_count() {
    let data = vec![
        vec![1.0, 1.0],
        vec![1.0, 1.0],
        vec![4.0, 4.0],
        vec![1.0, 1.0],
        vec![4.0, 4.0],
    ];
    let result = kmeans(&data, &KMeansConfig::new(4), &Euclidean).unwrap();

    assert_eq!(result.len(), 2, "only two distinct points exist");
    assert_partition(&result, data.len());
    assert_eq!(total_sum_of_squared_error(&result), 0.0);
}

#[test]
fn test_all_identical_points() {
    let data = vec![vec![2.5, -1.0]; 8];
    let result = kmeans(&data, &KMeansConfig::new(3), &Euclidean).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].centroid, vec![2.5, -1.0]);
    assert_eq!(result[0].cluster.len(), 8);
}

#[test]
fn test_emptied_cluster_is_replaced() {
    // With the zero seed the (2,0) centroid loses all of its items after the
    // first move and is reseeded.
    let data = vec![
        vec![2.0, 0.0],
        vec![0.0, 8.0],
        vec![0.0, 0.0],
        vec![4.0, 7.0],
        vec![6.0, 7.0],
        vec![5.0, 5.0],
        vec![9.0, 8.0],
    ];
    let config = KMeansConfig::new(3).with_restarts(1);
    let result = kmeans(&data, &config, &Euclidean).unwrap();

    assert_eq!(result.len(), 3);
    assert_partition(&result, data.len());

    let clusters: Vec<Vec<usize>> = result
        .iter()
        .map(|entry| entry.cluster.iter().map(|p| p.index).collect())
        .collect();
    assert_eq!(clusters, vec![vec![1, 3, 4, 5, 6], vec![2], vec![0]]);
    assert_eq!(result[2].centroid, vec![2.0, 0.0]);
    assert_relative_eq!(total_sum_of_squared_error(&result), 48.8, epsilon = 1e-9);
}

// ============================================================================
// Reproducibility Tests
// ============================================================================

#[test]
fn test_reproducibility_with_seed() {
    let data = generate_square_groups(120, 17);
    let config = KMeansConfig::new(7).with_seed([12, 34, 56, 78]);

    let first = kmeans(&data, &config, &Euclidean).unwrap();
    let second = kmeans(&data, &config, &Euclidean).unwrap();
    assert_eq!(first, second, "Same seed should give identical results");
}

#[test]
fn test_explicit_rng_matches_config_seed() {
    let data = generate_square_groups(64, 21);
    let config = KMeansConfig::new(3).with_seed([5, 6, 7, 8]);

    let from_config = kmeans(&data, &config, &Euclidean).unwrap();
    let mut rng = Sfc32::new(5, 6, 7, 8);
    let from_rng = kmeans_with_rng(&data, &config, &Euclidean, &mut rng).unwrap();
    assert_eq!(from_config, from_rng);
}

#[test]
fn test_any_rand_generator() {
    let data = generate_square_groups(100, 42);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let result = kmeans_with_rng(&data, &KMeansConfig::new(4), &Euclidean, &mut rng).unwrap();
    assert_eq!(result.len(), 4);
    assert_partition(&result, data.len());

    let mut again = ChaCha8Rng::seed_from_u64(42);
    let repeat = kmeans_with_rng(&data, &KMeansConfig::new(4), &Euclidean, &mut again).unwrap();
    assert_eq!(result, repeat);
}

#[test]
fn test_more_restarts_never_increase_error() {
    let data = generate_square_groups(90, 13);
    let mut single_rng = Sfc32::new(2, 4, 6, 8);
    let mut many_rng = single_rng.clone();

    let single = kmeans_with_rng(
        &data,
        &KMeansConfig::new(9).with_restarts(1),
        &Euclidean,
        &mut single_rng,
    )
    .unwrap();
    let many = kmeans_with_rng(
        &data,
        &KMeansConfig::new(9).with_restarts(8),
        &Euclidean,
        &mut many_rng,
    )
    .unwrap();

    // The first restart of `many` is exactly the run of `single`
    assert!(total_sum_of_squared_error(&many) <= total_sum_of_squared_error(&single));
}

// ============================================================================
// Randomized Property Tests
// ============================================================================

#[test]
fn test_arbitrary_inputs_give_valid_results() {
    let mut rng = Sfc32::new(1, 10, 100, 1000);
    let random_int = |rng: &mut Sfc32, limit: usize| (unit_f64(rng) * limit as f64) as usize;

    for dimension in 1..5 {
        for _ in 0..100 {
            let size = random_int(&mut rng, 100) + 1;
            let points: Vec<Vec<f64>> = (0..size)
                .map(|_| (0..dimension).map(|_| unit_f64(&mut rng)).collect())
                .collect();
            let k = random_int(&mut rng, size - 1) + 1;

            let result = kmeans(&points, &KMeansConfig::new(k), &Euclidean).unwrap();
            assert_eq!(result.len(), k, "size {} dimension {}", size, dimension);
            assert_partition(&result, size);
        }
    }
}

// ============================================================================
// Item Type Tests
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    sensor: &'static str,
    celsius: f64,
}

fn reading_metric() -> impl Metric<Reading> {
    FnMetric::new(
        |a: &Reading, b: &Reading| (a.celsius - b.celsius).powi(2),
        |members: &[&Reading]| Reading {
            sensor: "centroid",
            celsius: members.iter().map(|r| r.celsius).sum::<f64>() / members.len() as f64,
        },
    )
}

#[test]
fn test_custom_item_type() {
    let readings: Vec<Reading> = [
        ("a", 20.0),
        ("b", 35.5),
        ("c", 21.0),
        ("d", 36.5),
        ("e", 20.5),
    ]
    .iter()
    .map(|&(sensor, celsius)| Reading { sensor, celsius })
    .collect();

    let mut result = kmeans(&readings, &KMeansConfig::new(2), &reading_metric()).unwrap();
    result.sort_by_key(|entry| entry.cluster[0].index);

    let cool: Vec<&str> = result[0].cluster.iter().map(|p| p.item.sensor).collect();
    let warm: Vec<&str> = result[1].cluster.iter().map(|p| p.item.sensor).collect();
    assert_eq!(cool, vec!["a", "c", "e"]);
    assert_eq!(warm, vec!["b", "d"]);
    assert_relative_eq!(result[0].centroid.celsius, 20.5);
    assert_relative_eq!(result[1].centroid.celsius, 36.0);
}

#[test]
fn test_fixed_size_arrays() {
    let data: Vec<[f64; 2]> = vec![[0.0, 0.0], [0.0, 1.0], [30.0, 30.0], [31.0, 30.0]];
    let mut result = kmeans(&data, &KMeansConfig::new(2), &Euclidean).unwrap();
    result.sort_by_key(|entry| entry.cluster[0].index);

    assert_eq!(result[0].centroid, [0.0, 0.5]);
    assert_eq!(result[1].centroid, [30.5, 30.0]);
}

#[test]
fn test_ndarray_vectors() {
    let data: Vec<Array1<f64>> = vec![
        array![1.0, 1.0, 1.0],
        array![1.5, 1.0, 1.0],
        array![-8.0, -8.0, -8.0],
        array![-8.5, -8.0, -8.0],
    ];
    let mut model = KMeans::new(2);
    let labels = model.fit_predict(&data).unwrap();

    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[2], labels[3]);
    assert_ne!(labels[0], labels[2]);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_missing_k_is_unsupported() {
    let data = vec![vec![1.0], vec![2.0]];
    let result = kmeans(&data, &KMeansConfig::default(), &Euclidean);
    assert!(matches!(result, Err(KMeansError::Unsupported(_))));
}

#[test]
fn test_invalid_k_zero() {
    let data = vec![vec![1.0], vec![2.0]];
    let result = kmeans(&data, &KMeansConfig::new(0), &Euclidean);
    assert!(matches!(result, Err(KMeansError::InvalidParameter(_))));
}

#[test]
fn test_ragged_vectors_are_rejected() {
    let data = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0]];
    let result = kmeans(&data, &KMeansConfig::new(2), &Euclidean);

    match result {
        Err(KMeansError::InvalidInput(message)) => assert!(message.contains("index 2")),
        other => panic!("Expected InvalidInput error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_invalid_restarts_zero() {
    let data = vec![vec![1.0], vec![2.0]];
    let result = kmeans(&data, &KMeansConfig::new(1).with_restarts(0), &Euclidean);
    assert!(matches!(result, Err(KMeansError::InvalidParameter(_))));
}

#[test]
fn test_predict_before_fit_fails() {
    let model: KMeans<Vec<f64>> = KMeans::new(2);
    match model.predict(&[vec![1.0]]) {
        Err(KMeansError::NotFitted) => {}
        _ => panic!("Expected NotFitted error"),
    }
}

#[test]
fn test_error_messages() {
    assert_eq!(
        KMeansError::InvalidParameter("k must be greater than 0".to_string()).to_string(),
        "Invalid parameter: k must be greater than 0"
    );
    assert_eq!(
        KMeansError::NotFitted.to_string(),
        "Model has not been fitted. Call fit() first."
    );
}
