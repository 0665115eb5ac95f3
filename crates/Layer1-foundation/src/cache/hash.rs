//! Hashing utilities for cache keys

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a hash for any hashable value
///
/// `DefaultHasher::new()` uses fixed keys, so the result is stable within a process.
pub fn compute_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Combine hashes where position matters
#[inline]
pub fn combine_ordered(seed: u64, value: u64) -> u64 {
    seed.wrapping_mul(0x0000_0100_0000_01b3).wrapping_add(value) ^ (seed >> 29)
}

/// Combine hashes where order must not matter (commutative)
#[inline]
pub fn combine_unordered(acc: u64, value: u64) -> u64 {
    acc.wrapping_add(value.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}
