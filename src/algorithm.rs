use crate::distance::Metric;
use crate::seeding::plus_plus_init;
use rand::RngCore;
use tracing::{debug, info, trace};

/// Result of assigning every item to its nearest centroid
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Input indices owned by each centroid, in centroid order.
    /// Indices within a cluster are ascending.
    pub clusters: Vec<Vec<usize>>,

    /// Sum of squared distances from each centroid to its members
    pub sums_of_squared_error: Vec<f64>,
}

impl Assignment {
    /// Total sum of squared error over all clusters
    pub fn total_sum_of_squared_error(&self) -> f64 {
        self.sums_of_squared_error.iter().fold(0.0, |acc, x| acc + x)
    }
}

/// One seed-and-refine run that reached a fixed point
#[derive(Debug)]
pub(crate) struct Run<T> {
    pub centroids: Vec<T>,
    pub assignment: Assignment,
    pub rounds: usize,
}

/// Index of and squared distance to the closest centroid.
///
/// Ties go to the lowest index. `centroids` must not be empty.
#[inline]
pub(crate) fn nearest<T, M: Metric<T>>(centroids: &[T], item: &T, metric: &M) -> (usize, f64) {
    let mut best = 0;
    let mut best_distance = metric.squared_distance(&centroids[0], item);

    for (j, centroid) in centroids.iter().enumerate().skip(1) {
        let distance = metric.squared_distance(centroid, item);
        if distance < best_distance {
            best_distance = distance;
            best = j;
        }
    }

    (best, best_distance)
}

/// Assign each item in `data` to its nearest centroid.
///
/// Items are visited in input order, so every cluster lists its indices in
/// ascending order. The output has one cluster (possibly empty) per centroid.
///
/// # Panics
///
/// Panics if `centroids` is empty while `data` is not.
pub fn assign<T, M: Metric<T>>(centroids: &[T], data: &[T], metric: &M) -> Assignment {
    let mut clusters = vec![Vec::new(); centroids.len()];
    let mut sums_of_squared_error = vec![0.0; centroids.len()];

    for (index, item) in data.iter().enumerate() {
        let (closest, distance) = nearest(centroids, item, metric);
        clusters[closest].push(index);
        sums_of_squared_error[closest] += distance;
    }

    Assignment {
        clusters,
        sums_of_squared_error,
    }
}

/// Drop centroids that own no items, together with their empty clusters.
///
/// Removal is by slot, so two centroids with equal values never shadow each other.
fn drop_orphans<T>(centroids: Vec<T>, clusters: Vec<Vec<usize>>) -> (Vec<T>, Vec<Vec<usize>>) {
    centroids
        .into_iter()
        .zip(clusters)
        .filter(|(_, cluster)| !cluster.is_empty())
        .unzip()
}

/// Seed with K-Means++ and iterate until cluster membership stops changing.
///
/// Each round:
/// 1. drops orphan centroids,
/// 2. tops the survivors back up to `k` with K-Means++ draws,
/// 3. moves every surviving centroid to the centroid of its previous cluster
///    (freshly seeded slots keep their seed item),
/// 4. reassigns all items.
///
/// The run stops when the new clusters equal the previous surviving ones.
pub(crate) fn refine<T, M, R>(data: &[T], k: usize, metric: &M, rng: &mut R) -> Run<T>
where
    T: Clone,
    M: Metric<T>,
    R: RngCore + ?Sized,
{
    let mut centroids = plus_plus_init(data, k, metric, rng, Vec::new());
    let mut assignment = assign(&centroids, data, metric);
    let mut rounds = 0;

    loop {
        rounds += 1;

        let (survivors, clusters) = drop_orphans(centroids, assignment.clusters);
        let n_survivors = survivors.len();
        let seeded = if n_survivors < k {
            plus_plus_init(data, k, metric, rng, survivors)
        } else {
            survivors
        };
        if seeded.len() > n_survivors {
            debug!(
                round = rounds,
                reseeded = seeded.len() - n_survivors,
                "replaced orphan centroids"
            );
        }

        let moved: Vec<T> = seeded
            .into_iter()
            .enumerate()
            .map(|(slot, seed)| match clusters.get(slot) {
                Some(members) => {
                    let items: Vec<&T> = members.iter().map(|&i| &data[i]).collect();
                    metric.centroid(&items)
                }
                None => seed,
            })
            .collect();

        let next = assign(&moved, data, metric);
        let converged = next.clusters == clusters;
        trace!(round = rounds, centroids = moved.len(), converged, "refinement round");

        centroids = moved;
        assignment = next;
        if converged {
            break;
        }
    }

    Run {
        centroids,
        assignment,
        rounds,
    }
}

/// Run [`refine`] `restarts` times and keep the run with the lowest total
/// sum of squared error. Ties keep the earliest run.
///
/// The generator is shared, so every restart continues its stream.
pub(crate) fn best_of_restarts<T, M, R>(
    data: &[T],
    k: usize,
    restarts: usize,
    metric: &M,
    rng: &mut R,
    verbose: bool,
) -> Run<T>
where
    T: Clone,
    M: Metric<T>,
    R: RngCore + ?Sized,
{
    if verbose {
        info!(
            items = data.len(),
            k,
            restarts,
            "Clustering with K-Means++"
        );
    }

    let mut best = refine(data, k, metric, rng);
    let mut best_sse = best.assignment.total_sum_of_squared_error();
    let mut best_restart = 0;
    report_restart(0, restarts, &best, best_sse, verbose);

    for restart in 1..restarts {
        let run = refine(data, k, metric, rng);
        let sse = run.assignment.total_sum_of_squared_error();
        report_restart(restart, restarts, &run, sse, verbose);

        if sse < best_sse {
            best = run;
            best_sse = sse;
            best_restart = restart;
        }
    }

    if verbose {
        info!(
            restart = best_restart + 1,
            sse = best_sse,
            clusters = best.centroids.len(),
            "Selected best restart"
        );
    }

    best
}

fn report_restart<T>(restart: usize, restarts: usize, run: &Run<T>, sse: f64, verbose: bool) {
    debug!(
        restart = restart + 1,
        restarts,
        rounds = run.rounds,
        sse,
        "restart finished"
    );
    if verbose {
        info!(
            "  Restart {}/{}: {} rounds, sse = {:.6}",
            restart + 1,
            restarts,
            run.rounds,
            sse
        );
    }
}
