//! # Probe Chain
//!
//! Hash maps over a prime number of buckets, with two collision strategies.
//!
//! This crate provides two hash map implementations:
//!
//! - `OpenAddressingMap`: quadratic probing with tombstone deletion, grows at load factor 0.5
//! - `ChainingMap`: separate chaining over per-bucket linked lists, grows at load factor 1.0
//!
//! Both take a pluggable key hasher (any `Fn(&str) -> u64`), round every capacity up to a
//! prime, and double the table when the load threshold is reached.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probe_chain::OpenAddressingMap;
//!
//! // Create a new hash map with at least 20 buckets
//! let mut map = OpenAddressingMap::with_capacity(20);
//! assert_eq!(map.capacity(), 23);
//!
//! // Insert values
//! map.put("apple", 1);
//! map.put("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10);
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Custom Hashers
//!
//! ```rust
//! use probe_chain::{ChainingMap, hash_function_2};
//!
//! let mut map = ChainingMap::with_capacity_and_hasher(11, hash_function_2);
//! for i in 1..=5 {
//!     map.put(i.to_string(), i * 10);
//! }
//!
//! // Shrinking keeps every entry, the chains just get longer
//! map.resize_table(2);
//! assert_eq!(map.capacity(), 2);
//! assert_eq!(map.get_keys_and_values().len(), 5);
//!
//! // Closures work too
//! let mut by_length = ChainingMap::with_capacity_and_hasher(7, |key: &str| key.len() as u64);
//! by_length.put("melon", 3);
//! assert!(by_length.contains_key("melon"));
//! ```

/// Fixed-length slot array backing both maps
mod bucket_store;
/// Singly linked chain used by the chaining map
mod chain;
/// Separate chaining hash map
mod chaining;
/// Pluggable key hashers
mod hash;
/// Mode finding on top of the chaining map
mod mode;
/// Quadratic probing hash map with tombstones
mod open_addressing;
/// Prime capacity selection
mod prime;
/// Utility traits for the hash maps
mod utils;

pub use chaining::{ChainingMap, Iter as ChainingIter};
pub use hash::{HashFn, KeyHasher, StdKeyHasher, hash_function_1, hash_function_2};
pub use mode::find_mode;
pub use open_addressing::{Iter as OpenAddressingIter, OpenAddressingMap};
pub use prime::{is_prime, next_prime};
pub use utils::HashMapExtensions;

/// Bucket count used by `new()` and `Default`
pub const DEFAULT_CAPACITY: usize = 11;
