//! Deterministic PRNG based on the Xorshift64 algorithm.
//!
//! Every consumer of randomness (palette sampling, blob wobble, layer layout)
//! takes `&mut Xorshift64` explicitly. There is no process-wide generator, so
//! two renders never share state and the same seed always replays the same
//! poster.

use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed of 0 is replaced with
/// a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Fallback seed used when the caller provides 0, which is a fixed point
    /// of the xorshift algorithm.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    ///
    /// Uses the upper 53 bits of `next_u64()` divided by 2^53 for
    /// full mantissa precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns `lo + u * (hi - lo)` for a uniform `u` in [0, 1).
    ///
    /// The bounds are not required to be ordered: a reversed range such as
    /// `(0.38, 0.3)` yields values between the two bounds.
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Returns a uniformly distributed usize in [0, max).
    ///
    /// Uses simple modulo reduction. For non-power-of-two `max` values,
    /// this introduces negligible bias at 64-bit state width.
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0 (division by zero in modulo).
    pub fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }

    /// Returns a uniformly distributed integer in the inclusive range [lo, hi].
    ///
    /// Bounds are swapped if given in reverse order.
    pub fn next_int(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = hi.abs_diff(lo).wrapping_add(1);
        if span == 0 {
            // Full 64-bit span.
            return self.next_u64() as i64;
        }
        lo.wrapping_add((self.next_u64() % span) as i64)
    }

    /// Picks one element of `items` uniformly, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        Some(&items[self.next_usize(items.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this test breaks, the PRNG algorithm changed and every recorded
        // poster seed renders differently.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0, "seed=0 guard failed");
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn two_instances_with_same_seed_produce_identical_sequences() {
        let mut rng_a = Xorshift64::new(42);
        let mut rng_b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(
                rng_a.next_u64(),
                rng_b.next_u64(),
                "sequences diverged at index {i}"
            );
        }
    }

    #[test]
    fn next_f64_always_in_unit_interval() {
        let mut rng = Xorshift64::new(12345);
        for i in 0..10_000 {
            let v = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&v),
                "next_f64() = {v} out of [0, 1) at iteration {i}"
            );
        }
    }

    #[test]
    fn next_range_stays_within_specified_bounds() {
        let mut rng = Xorshift64::new(9999);
        for i in 0..10_000 {
            let v = rng.next_range(10.0, 20.0);
            assert!(
                (10.0..20.0).contains(&v),
                "next_range(10, 20) = {v} out of bounds at iteration {i}"
            );
        }
    }

    #[test]
    fn next_range_reversed_bounds_stays_between_them() {
        let mut rng = Xorshift64::new(31337);
        for _ in 0..10_000 {
            let v = rng.next_range(0.38, 0.3);
            assert!(
                (0.3 - 1e-12..=0.38 + 1e-12).contains(&v),
                "reversed range produced {v}"
            );
        }
    }

    #[test]
    fn next_range_degenerate_range_returns_bound() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..100 {
            assert_eq!(rng.next_range(0.15, 0.15), 0.15);
        }
    }

    #[test]
    fn next_int_is_inclusive_on_both_ends() {
        let mut rng = Xorshift64::new(2024);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let v = rng.next_int(0, 4);
            assert!((0..=4).contains(&v), "next_int(0, 4) = {v}");
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "not every value was produced: {seen:?}");
    }

    #[test]
    fn next_int_single_value_range() {
        let mut rng = Xorshift64::new(8);
        for _ in 0..50 {
            assert_eq!(rng.next_int(7, 7), 7);
        }
    }

    #[test]
    fn next_int_swaps_reversed_bounds() {
        let mut rng = Xorshift64::new(77);
        for _ in 0..500 {
            let v = rng.next_int(10, -10);
            assert!((-10..=10).contains(&v), "got {v}");
        }
    }

    #[test]
    fn choose_empty_slice_is_none() {
        let mut rng = Xorshift64::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn choose_returns_member_of_slice() {
        let mut rng = Xorshift64::new(3);
        let items = ["a", "b", "c"];
        for _ in 0..100 {
            let picked = rng.choose(&items).unwrap();
            assert!(items.contains(picked));
        }
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(
                rng.next_u64(),
                restored.next_u64(),
                "sequences diverged after deserialization at index {i}"
            );
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn next_range_in_bounds_for_any_seed_and_range(
                seed: u64,
                min in -1e6_f64..1e6,
                max in -1e6_f64..1e6,
            ) {
                prop_assume!(min < max);
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(
                        v >= min && v < max,
                        "next_range({min}, {max}) = {v} out of bounds for seed {seed}"
                    );
                }
            }

            #[test]
            fn next_int_in_bounds_for_any_seed(
                seed: u64,
                lo in -1000_i64..1000,
                width in 0_i64..1000,
            ) {
                let hi = lo + width;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_int(lo, hi);
                    prop_assert!(v >= lo && v <= hi, "next_int({lo}, {hi}) = {v}");
                }
            }

            #[test]
            fn next_f64_approximate_uniformity(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                let mut buckets = [0u32; 10];
                for _ in 0..10_000 {
                    let v = rng.next_f64();
                    let idx = (v * 10.0).min(9.0) as usize;
                    buckets[idx] += 1;
                }
                for (i, &count) in buckets.iter().enumerate() {
                    prop_assert!(
                        count >= 500,
                        "bucket {i} has only {count} values (expected ~1000) for seed {seed}"
                    );
                }
            }
        }
    }
}
