//! Pluggable key hashers.
//!
//! The engines only need a deterministic `&str -> u64`; distribution quality
//! affects probe and chain lengths, never correctness.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Maps a key to a non-negative integer. Must be deterministic per key.
pub trait KeyHasher {
    /// Hashes `key`.
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Plain function pointer hasher, the default hasher type of both engines.
pub type HashFn = fn(&str) -> u64;

/// Sum of the key's code points.
///
/// Anagrams collide, which makes it handy for exercising collision paths.
#[must_use]
pub fn hash_function_1(key: &str) -> u64 {
    key.chars().fold(0u64, |hash, c| hash.wrapping_add(u64::from(c)))
}

/// Sum of code points weighted by their 1-based position.
#[must_use]
pub fn hash_function_2(key: &str) -> u64 {
    key.chars()
        .zip(1u64..)
        .fold(0u64, |hash, (c, position)| hash.wrapping_add(position.wrapping_mul(u64::from(c))))
}

/// Adapter over the standard library's SipHash.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdKeyHasher;

impl KeyHasher for StdKeyHasher {
    fn hash_key(&self, key: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }
}
