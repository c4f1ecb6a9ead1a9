//! Random key sequences for filling and probing the collections
//!
//! Every generator is an explicit value with its own seed and state. Nothing is shared between
//! generators.

use rand::prelude::*;

/// A source of keys drawn uniformly from an inclusive range
pub trait KeySource {
    /// Returns the next key in `[min, max]`
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    fn next_key(&mut self, min: i64, max: i64) -> i64;

    /// Returns `count` keys in `[min, max]`. Keys may repeat.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    fn keys(&mut self, count: usize, min: i64, max: i64) -> Vec<i64> {
        (0..count).map(|_| self.next_key(min, max)).collect()
    }
}

/// The parameters of a linear congruential generator: `x' = (multiplier * x + increment) % modulus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LcgParams {
    pub modulus: u64,
    pub multiplier: u64,
    pub increment: u64,
}

impl Default for LcgParams {
    fn default() -> Self {
        Self {
            modulus: 116_640,
            multiplier: 1021,
            increment: 24_631,
        }
    }
}

/// A linear congruential generator
///
/// Keys are produced as `min + x % (max - min + 1)`. Since `x` is always below the modulus, only
/// ranges narrower than the modulus are covered completely. Use [`KeyGen`] for wider ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u64,
    params: LcgParams,
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Lcg {
    /// Creates a generator with the default parameters, starting from `seed`
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, LcgParams::default())
    }

    /// # Panics
    ///
    /// Panics if `params.modulus` is 0.
    pub fn with_params(seed: u64, params: LcgParams) -> Self {
        assert!(params.modulus > 0, "LCG modulus must be non-zero");
        Self {state: seed % params.modulus, params}
    }

    pub fn params(&self) -> LcgParams {
        self.params
    }

    /// Advances the generator and returns the new state, always in `[0, modulus)`
    pub fn next_raw(&mut self) -> u64 {
        let LcgParams {modulus, multiplier, increment} = self.params;
        // Widened so that large parameters cannot overflow
        let next = (multiplier as u128 * self.state as u128 + increment as u128) % modulus as u128;
        self.state = next as u64;
        self.state
    }
}

/// Number of distinct keys in `[min, max]`
fn span(min: i64, max: i64) -> u64 {
    assert!(min <= max, "empty key range: [{}, {}]", min, max);
    (max as i128 - min as i128 + 1) as u64
}

impl KeySource for Lcg {
    fn next_key(&mut self, min: i64, max: i64) -> i64 {
        // A range covering all of `i64` has a span of 2^64, which wraps to 0
        let offset = match span(min, max) {
            0 => self.next_raw(),
            span => self.next_raw() % span,
        };
        (min as i128 + offset as i128) as i64
    }
}

/// Generates keys uniformly from any [`rand`] generator
#[derive(Debug, Clone)]
pub struct KeyGen<R = StdRng> {
    rng: R,
}

impl KeyGen<StdRng> {
    /// Creates a reproducible generator from `seed`
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::keygen::{KeyGen, KeySource};
    ///
    /// let mut keys = KeyGen::seeded(7);
    /// assert_eq!(keys.keys(3, 1, 10), KeyGen::seeded(7).keys(3, 1, 10));
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> KeyGen<R> {
    pub fn from_rng(rng: R) -> Self {
        Self {rng}
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> KeySource for KeyGen<R> {
    fn next_key(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "empty key range: [{}, {}]", min, max);
        self.rng.gen_range(min..=max)
    }
}
