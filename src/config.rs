/// Configuration for the K-Means++ algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansConfig {
    /// Number of clusters. Deriving k from the data is not implemented,
    /// so leaving this as `None` makes clustering fail with `Unsupported`.
    /// Values larger than the data length are clamped to it.
    pub k: Option<usize>,

    /// Number of independent seed-and-refine runs. The run with the lowest
    /// total sum of squared error wins. `None` means `max(1, floor(log2(n)))`.
    pub restarts: Option<usize>,

    /// Seed words for the default [`Sfc32`](crate::Sfc32) generator, used
    /// whenever no generator is passed explicitly.
    pub seed: [u32; 4],

    /// Emit per-restart progress at `info` level
    pub verbose: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: None,
            restarts: None,
            seed: [0; 4],
            verbose: false,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k: Some(k),
            ..Default::default()
        }
    }

    /// Set the number of restarts
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = Some(restarts);
        self
    }

    /// Set the seed words of the default generator
    pub fn with_seed(mut self, seed: [u32; 4]) -> Self {
        self.seed = seed;
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Restart count used for `n` items when none is configured.
    pub(crate) fn default_restarts(n: usize) -> usize {
        if n < 2 {
            1
        } else {
            (usize::BITS - 1 - n.leading_zeros()) as usize
        }
    }
}
