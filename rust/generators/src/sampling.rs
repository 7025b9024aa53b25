// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seeded subset selection
//!
//! The partition primitive shared by the window and rain generators: remove
//! a fraction of a working list by repeated pick-and-remove, reseeding from
//! `(seed, iteration)` each round. Reseeding per iteration reproduces the
//! same partition for the same seed regardless of what else consumed
//! randomness earlier in the call.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Remove `⌊len · fraction⌋` elements from `items`, returning them in
/// removal order. Iteration `i` draws from a fresh stream seeded with
/// `seed + salt + i`; `salt` keeps sibling partitions in one operator call
/// on distinct streams.
pub fn remove_random_fraction<T>(
    items: &mut Vec<T>,
    fraction: f64,
    seed: u64,
    salt: u64,
) -> Vec<T> {
    let count = (items.len() as f64 * fraction) as usize;
    let mut removed = Vec::with_capacity(count);
    for i in 0..count {
        let mut rng = ChaCha8Rng::seed_from_u64(seed + salt + i as u64);
        let idx = rng.gen_range(0..items.len());
        removed.push(items.remove(idx));
    }
    removed
}

/// Convert a "percentage kept" amount into the fraction to remove
#[inline]
pub fn fraction_removed(amount_percent: u32) -> f64 {
    1.0 - (amount_percent as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_for_seed() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b: Vec<u32> = (0..20).collect();
        let removed_a = remove_random_fraction(&mut a, 0.6, 50, 1);
        let removed_b = remove_random_fraction(&mut b, 0.6, 50, 1);
        assert_eq!(removed_a, removed_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_salt_changes_partition() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b: Vec<u32> = (0..20).collect();
        let removed_a = remove_random_fraction(&mut a, 0.6, 50, 0);
        let removed_b = remove_random_fraction(&mut b, 0.6, 50, 1);
        assert_ne!(removed_a, removed_b);
    }

    #[test]
    fn test_removal_count_truncates() {
        let mut items: Vec<u32> = (0..10).collect();
        let removed = remove_random_fraction(&mut items, 0.6, 50, 1);
        assert_eq!(removed.len(), 6);
        assert_eq!(items.len(), 4);

        let mut items: Vec<u32> = (0..7).collect();
        let removed = remove_random_fraction(&mut items, 0.5, 9, 0);
        assert_eq!(removed.len(), 3);
    }

    #[test]
    fn test_kept_preserve_relative_order() {
        let mut items: Vec<u32> = (0..50).collect();
        remove_random_fraction(&mut items, 0.4, 7, 0);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(items, sorted);
    }

    #[test]
    fn test_fraction_removed() {
        assert_eq!(fraction_removed(40), 0.6);
        assert_eq!(fraction_removed(100), 0.0);
        assert_eq!(fraction_removed(0), 1.0);
    }
}
