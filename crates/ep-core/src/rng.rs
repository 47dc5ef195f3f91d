//! The injected randomness capability and its seeded default.
//!
//! # Determinism strategy
//!
//! Every stochastic decision in the simulator (task attributes, inter-arrival
//! gaps, mobility steps) goes through a single [`RandomSource`] owned by the
//! simulation.  Because dispatch is single-threaded and events are totally
//! ordered, the sequence of draws is a pure function of the seed: two runs
//! with the same seed, distance function and path produce identical traces.
//!
//! Tests substitute a scripted source to pin exact event times.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of the three distributions the simulator samples from.
///
/// Both ranges are inclusive of `lo`; `uniform_int` is also inclusive of
/// `hi`.  A degenerate range (`hi <= lo`) yields `lo`.
pub trait RandomSource {
    /// Integer drawn uniformly from `lo..=hi`.
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64;

    /// Real drawn uniformly from `lo..hi`.
    fn uniform_real(&mut self, lo: f64, hi: f64) -> f64;

    /// Index into `weights`, chosen with probability proportional to its
    /// weight.  `None` if `weights` is empty, contains a negative or
    /// non-finite value, or sums to zero.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize>;

    /// Pick one of `items` with the matching `weights`.
    ///
    /// `None` if the slices differ in length or the weights are unusable.
    fn weighted_choice<'a, T>(&mut self, items: &'a [T], weights: &[f64]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.len() != weights.len() {
            return None;
        }
        self.weighted_index(weights).and_then(|i| items.get(i))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seeded simulation-level RNG.
///
/// Used only from the single-threaded dispatch loop.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    #[inline]
    fn uniform_real(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..hi)
    }

    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(&mut self.0))
    }
}
