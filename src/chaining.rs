use std::{fmt, iter::FusedIterator, mem};

use log::debug;

use crate::{
    bucket_store::BucketStore,
    chain::{Chain, ChainIter},
    hash::{HashFn, KeyHasher, hash_function_1},
    prime::{next_prime, resize_target},
};

/// A hash table with separate chaining over a prime number of buckets.
///
/// Each bucket owns a singly linked chain; removal unlinks the node, so
/// there are no tombstones. The table doubles (to the next prime) once the
/// load factor reaches [`MAX_LOAD_FACTOR`](Self::MAX_LOAD_FACTOR).
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct ChainingMap<V, H = HashFn> {
    /// One chain per bucket, always a prime number of them
    buckets: BucketStore<Chain<V>>,
    /// Number of entries across all chains
    size: usize,
    /// Maps keys to bucket indices
    hasher: H,
}

impl<V> Default for ChainingMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ChainingMap<V> {
    /// Creates an empty map with 11 buckets and [`hash_function_1`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(crate::DEFAULT_CAPACITY)
    }

    /// Creates an empty map with at least `capacity` buckets and [`hash_function_1`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, hash_function_1)
    }
}

impl<V, H: KeyHasher> Extend<(String, V)> for ChainingMap<V, H> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<V> FromIterator<(String, V)> for ChainingMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V, H: KeyHasher> ChainingMap<V, H> {
    /// Load factor at which `put` doubles the table before inserting
    pub const MAX_LOAD_FACTOR: f64 = 1.0;

    /// Creates an empty map using `hasher`.
    ///
    /// `capacity` is rounded up to the next odd prime, so 0 and 2 both give 3.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self { buckets: BucketStore::new(next_prime(capacity)), size: 0, hasher }
    }

    /// Gets the bucket of a key
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn bucket_index(&self, key: &str) -> usize {
        // capacity is at least 2 and the remainder is below it
        (self.hasher.hash_key(key) % self.buckets.len() as u64) as usize
    }

    /// Inserts or updates a key-value pair.
    ///
    /// Returns the previous value if `key` was already present.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        if self.table_load() >= Self::MAX_LOAD_FACTOR {
            self.resize_table(self.capacity().saturating_mul(2));
        }
        self.insert_into_chain(key.into(), value)
    }

    /// Updates the key in its chain, or pushes a new node
    fn insert_into_chain(&mut self, key: String, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let chain = self.buckets.slot_mut(index)?;

        if let Some(existing) = chain.find_mut(&key) {
            return Some(mem::replace(existing, value));
        }
        chain.insert(key, value);
        self.size = self.size.saturating_add(1);
        None
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets.slot(self.bucket_index(key))?.find(key)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets.slot_mut(index)?.find_mut(key)
    }

    /// Returns `true` if the map holds `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key and returns its value, or `None` if it was absent
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_index(key);
        let removed = self.buckets.slot_mut(index)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(removed)
    }

    /// Rebuilds the table with `new_capacity` buckets.
    ///
    /// Ignored when `new_capacity < 1`. A prime request is used as is,
    /// anything else is rounded up to the next prime. Nodes are moved into
    /// the new chains without re-checking the load factor, so the table
    /// ends up with exactly the requested (prime) number of buckets; the
    /// next `put` grows it again if needed.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            return;
        }

        let target = resize_target(new_capacity);
        debug!(
            "resizing chaining table from {} to {} buckets ({} entries)",
            self.capacity(),
            target,
            self.size
        );

        let old = mem::replace(&mut self.buckets, BucketStore::new(target));
        self.size = 0;
        for mut chain in old {
            while let Some((key, value)) = chain.pop_front() {
                self.insert_into_chain(key, value);
            }
        }
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Returns the number of buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Removes every entry, keeping the current capacity
    pub fn clear(&mut self) {
        debug!("clearing chaining table ({} entries)", self.size);
        self.buckets = BucketStore::new(self.capacity());
        self.size = 0;
    }

    /// Key-value pairs in bucket order, then chain order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }

    /// Returns an iterator over the key-value pairs in bucket order, then chain order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.as_slice(), index: 0, chain: None }
    }
}

impl<'a, V, H: KeyHasher> IntoIterator for &'a ChainingMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One line per bucket: `index: -> (key: value) -> ...`
impl<V: fmt::Display, H> fmt::Display for ChainingMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{index}: {chain}")?;
        }
        Ok(())
    }
}

/// Iterator over the key-value pairs of a [`ChainingMap`]
#[derive(Debug)]
pub struct Iter<'a, V> {
    /// Reference to the buckets in the hash map
    buckets: &'a [Chain<V>],
    /// Next bucket to open once the current chain runs out
    index: usize,
    /// Position inside the chain being walked
    chain: Option<ChainIter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            let chain = self.buckets.get(self.index)?;
            self.index = self.index.saturating_add(1);
            self.chain = Some(chain.iter());
        }
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::{hash::hash_function_2, prime::is_prime};

    #[test]
    fn test_put_and_get() {
        let mut map = ChainingMap::new();
        assert_eq!(map.put("key1", 1), None);
        assert_eq!(map.put("key2", 2), None);
        assert_eq!(map.put("key3", 3), None);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_update() {
        let mut map = ChainingMap::new();
        assert_eq!(map.put("key1", 1), None);
        assert_eq!(map.put("key1", 10), Some(1));
        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_unlinks() {
        let mut map = ChainingMap::with_capacity(53);
        map.put("key1", 10);
        map.put("key2", 20);
        map.put("key3", 30);
        assert!(map.contains_key("key1"));
        assert!(!map.contains_key("key4"));

        assert_eq!(map.remove("key3"), Some(30));
        assert!(!map.contains_key("key3"));
        assert_eq!(map.get("key3"), None);
        assert_eq!(map.remove("key3"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_from_shared_chain() {
        // anagrams share a bucket under hash_function_1
        let mut map = ChainingMap::with_capacity(11);
        map.put("abc", 1);
        map.put("bca", 2);
        map.put("cab", 3);
        assert_eq!(map.empty_buckets(), 10);

        assert_eq!(map.remove("bca"), Some(2));
        assert_eq!(map.get("abc"), Some(&1));
        assert_eq!(map.get("cab"), Some(&3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_resize_keeps_entries() {
        let mut map = ChainingMap::with_capacity(20);
        map.put("key1", 10);
        assert_eq!(map.capacity(), 23);

        map.resize_table(30);
        assert_eq!(map.len(), 1);
        assert_eq!(map.capacity(), 31);
        assert_eq!(map.get("key1"), Some(&10));
    }

    #[test_log::test]
    fn test_resize_to_two_keeps_every_pair() {
        let mut map = ChainingMap::with_capacity_and_hasher(11, hash_function_2);
        for i in 1..=5 {
            map.put(i.to_string(), (i * 10).to_string());
        }
        assert_eq!(map.get_keys_and_values().len(), 5);

        map.resize_table(2);
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.len(), 5);

        let mut pairs: Vec<(String, String)> = map
            .get_keys_and_values()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        pairs.sort();
        let expected: Vec<(String, String)> =
            (1..=5).map(|i| (i.to_string(), (i * 10).to_string())).collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_resize_below_one_is_ignored() {
        let mut map = ChainingMap::with_capacity(11);
        map.put("a", 1);
        map.resize_table(0);
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.get("a"), Some(&1));
    }

    #[test_log::test]
    fn test_resize_preserves_membership() {
        let mut map = ChainingMap::with_capacity_and_hasher(75, hash_function_2);
        let keys: Vec<usize> = (1..1000).step_by(13).collect();
        for &key in &keys {
            map.put(key.to_string(), key * 42);
        }

        for capacity in (111..1000).step_by(117) {
            map.resize_table(capacity);
            assert!(is_prime(map.capacity()));

            map.put("some key", 0);
            assert!(map.contains_key("some key"));
            assert_eq!(map.remove("some key"), Some(0));

            for &key in &keys {
                assert!(map.contains_key(&key.to_string()));
                assert!(!map.contains_key(&(key + 1).to_string()));
            }
            assert_eq!(map.len(), keys.len());
        }
    }

    #[test]
    fn test_grows_at_load_one() {
        let mut map = ChainingMap::with_capacity(3);
        for i in 0..3 {
            map.put(format!("k{i}"), i);
        }
        assert_eq!(map.capacity(), 3);
        assert!((map.table_load() - 1.0).abs() < f64::EPSILON);

        map.put("k3", 3);
        assert_eq!(map.capacity(), 7);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_empty_buckets_counts_empty_chains() {
        let mut map = ChainingMap::with_capacity(101);
        assert_eq!(map.empty_buckets(), 101);
        map.put("key1", 10);
        assert_eq!(map.empty_buckets(), 100);
        map.put("key2", 20);
        assert_eq!(map.empty_buckets(), 99);
        map.put("key1", 30);
        assert_eq!(map.empty_buckets(), 99);
        // key1, key2 and key4 land in buckets 75, 76 and 78
        map.put("key4", 40);
        assert_eq!(map.empty_buckets(), 98);
    }

    #[test]
    fn test_iter_walks_buckets_then_chains() {
        let mut map = ChainingMap::with_capacity(11);
        // "c" -> bucket 0, "ab"/"ba" -> bucket 8, "a" -> bucket 9
        map.put("a", 1);
        map.put("ab", 2);
        map.put("ba", 3);
        map.put("c", 4);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["c", "ba", "ab", "a"]);

        let mut iter = map.iter();
        assert_eq!(iter.by_ref().count(), 4);
        assert_eq!(iter.next(), None);
        assert_eq!((&map).into_iter().count(), 4);
    }

    #[test]
    fn test_get_mut() {
        let mut map = ChainingMap::new();
        map.put("key1", 1);
        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }
        assert_eq!(map.get("key1"), Some(&11));
        assert!(map.get_mut("missing").is_none());
    }

    #[test]
    fn test_clear() {
        let mut map = ChainingMap::with_capacity(101);
        map.put("key1", 10);
        map.put("key2", 20);
        map.put("key1", 30);
        assert_eq!(map.len(), 2);

        map.clear();
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 101);
        assert_eq!(map.empty_buckets(), 101);
        assert!(!map.contains_key("key1"));
    }

    #[test]
    fn test_display() {
        let mut map = ChainingMap::with_capacity(3);
        map.put("a", 1); // 97 % 3 == 1
        map.put("d", 2); // 100 % 3 == 1
        assert_eq!(map.to_string(), "0: \n1: -> (d: 2) -> (a: 1)\n2: \n");
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut map: ChainingMap<i32> =
            vec![("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        map.extend(vec![("c".to_string(), 3), ("a".to_string(), 4)]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("a"), Some(&4));
    }

    proptest! {
        #[test]
        fn prop_matches_reference_model(ops in proptest::collection::vec((0u8..3, 0usize..40, any::<i32>()), 1..300)) {
            let mut map = ChainingMap::with_capacity_and_hasher(3, hash_function_2);
            let mut model = HashMap::new();

            for (op, k, value) in ops {
                let key = format!("k{k}");
                match op {
                    0 => prop_assert_eq!(map.put(key.clone(), value), model.insert(key.clone(), value)),
                    1 => prop_assert_eq!(map.remove(&key), model.remove(&key)),
                    _ => {
                        let before = map.capacity();
                        map.resize_table(k);
                        if k < 1 {
                            prop_assert_eq!(map.capacity(), before);
                        }
                    }
                }

                prop_assert!(is_prime(map.capacity()));
                prop_assert_eq!(map.len(), model.len());
                prop_assert_eq!(map.iter().count(), model.len());
                prop_assert_eq!(map.get(&key), model.get(&key));
            }

            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
        }
    }
}
