use rand::{Error, RngCore, SeedableRng};
use rand_core::impls;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Small Fast Counting generator (sfc32).
///
/// A 128-bit state, non-cryptographic generator. The same four seed words
/// always produce the same stream, which is what makes clustering runs
/// reproducible. The all-zero seed is the default.
///
/// Like every `RngCore`, a single instance must not be shared across threads
/// without external synchronization: each draw mutates the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sfc32 {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl Sfc32 {
    /// Create a generator from four seed words
    pub fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { a, b, c, d }
    }

    /// Create a generator from the seed words of a [`KMeansConfig`](crate::KMeansConfig)
    pub fn from_words([a, b, c, d]: [u32; 4]) -> Self {
        Self::new(a, b, c, d)
    }

    #[inline]
    fn step(&mut self) -> u32 {
        let t = self.a.wrapping_add(self.b).wrapping_add(self.d);
        self.d = self.d.wrapping_add(1);
        self.a = self.b ^ (self.b >> 9);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(21).wrapping_add(t);
        t
    }
}

impl RngCore for Sfc32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Sfc32 {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(seed.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self::from_words(words)
    }
}

/// Draw a uniform value in `[0, 1)` from a single 32-bit output.
///
/// All randomness used by the clustering engine goes through here, so an
/// [`Sfc32`] stream maps to exactly one float per step.
#[inline]
pub fn unit_f64<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    rng.next_u32() as f64 / TWO_POW_32
}
