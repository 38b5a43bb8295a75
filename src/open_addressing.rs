use std::{fmt, iter::FusedIterator, mem};

use log::{debug, trace};

use crate::{
    bucket_store::BucketStore,
    hash::{HashFn, KeyHasher, hash_function_1},
    prime::{next_prime, resize_target},
};

/// An occupied slot
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
    /// Flag indicating whether this entry has been deleted
    tombstone: bool,
}

/// Where a key belongs after walking its probe sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// A slot holding this key, live or tombstoned
    Found(usize),
    /// The first reusable slot: a tombstone seen on the way, else the empty slot ending the walk
    Vacant(usize),
    /// Every probed slot is live and holds another key
    Full,
}

/// A hash table with quadratic probing over a prime number of buckets.
///
/// Deleted entries are kept as tombstones so probe sequences of other keys
/// stay intact. The table doubles (to the next prime) once the load factor
/// reaches [`MAX_LOAD_FACTOR`](Self::MAX_LOAD_FACTOR).
///
/// Lookups scan the whole bucket array rather than following the probe
/// sequence, so they cost `O(capacity)`.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<V, H = HashFn> {
    /// The buckets storing the entries, always a prime number of them
    buckets: BucketStore<Option<Entry<V>>>,
    /// Number of live (non-tombstone) entries
    size: usize,
    /// Maps keys to bucket indices
    hasher: H,
}

impl<V> Default for OpenAddressingMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OpenAddressingMap<V> {
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

impl<V, H: KeyHasher> Extend<(String, V)> for OpenAddressingMap<V, H> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<V> FromIterator<(String, V)> for OpenAddressingMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V, H: KeyHasher> OpenAddressingMap<V, H> {
    /// Load factor at which `put` doubles the table before inserting
    pub const MAX_LOAD_FACTOR: f64 = 0.5;

    /// Creates an empty map using `hasher`.
    ///
    /// `capacity` is rounded up to the next odd prime, so 0 and 2 both give 3.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self { buckets: BucketStore::new(next_prime(capacity)), size: 0, hasher }
    }

    /// Gets the home bucket of a key
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn bucket_index(&self, key: &str) -> usize {
        // capacity is at least 2 and the remainder is below it
        (self.hasher.hash_key(key) % self.buckets.len() as u64) as usize
    }

    /// Walks the quadratic probe sequence `home + j²` of `key`
    #[allow(clippy::arithmetic_side_effects)]
    fn probe(&self, key: &str) -> Probe {
        let capacity = self.buckets.len();
        let home = self.bucket_index(key);
        let mut index = home;
        // j² mod capacity, advanced by the odd numbers 2j - 1
        let mut offset = 0;
        let mut first_tombstone = None;

        for j in 1..=capacity {
            match self.buckets.slot(index) {
                None | Some(None) => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Some(Some(entry)) if entry.key == key => return Probe::Found(index),
                Some(Some(entry)) => {
                    if entry.tombstone && first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
            }
            offset = (offset + 2 * j - 1) % capacity;
            index = (home + offset) % capacity;
        }

        first_tombstone.map_or(Probe::Full, Probe::Vacant)
    }

    /// Inserts or updates a key-value pair.
    ///
    /// Returns the previous value when `key` was live. Re-inserting a
    /// removed key revives its tombstone. The table doubles before the
    /// insert when the load factor is already at 0.5, and again after it if
    /// the new entry pushed the load past 0.5, so `table_load() <= 0.5`
    /// holds whenever `put` returns.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        if self.table_load() >= Self::MAX_LOAD_FACTOR {
            self.resize_table(self.capacity().saturating_mul(2));
        }
        let previous = self.insert_entry(key.into(), value);
        if self.table_load() > Self::MAX_LOAD_FACTOR {
            self.resize_table(self.capacity().saturating_mul(2));
        }
        previous
    }

    /// Places an entry without checking the load factor first
    fn insert_entry(&mut self, key: String, value: V) -> Option<V> {
        loop {
            let index = match self.probe(&key) {
                Probe::Found(index) | Probe::Vacant(index) => index,
                Probe::Full => {
                    trace!("probe sequence for {key:?} exhausted at {} buckets", self.capacity());
                    self.resize_table(self.capacity().saturating_mul(2));
                    continue;
                }
            };

            let slot = self.buckets.slot_mut(index)?;
            if let Some(entry) = slot.as_mut().filter(|entry| !entry.tombstone) {
                return Some(mem::replace(&mut entry.value, value));
            }
            if slot.is_some() {
                trace!("reusing tombstone at bucket {index} for {key:?}");
            }
            *slot = Some(Entry { key, value, tombstone: false });
            self.size = self.size.saturating_add(1);
            return None;
        }
    }

    /// Index of the live entry for `key`, scanning every bucket
    fn live_index(&self, key: &str) -> Option<usize> {
        self.buckets
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|entry| !entry.tombstone && entry.key == key))
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let index = self.live_index(key)?;
        self.buckets.slot(index)?.as_ref().map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.live_index(key)?;
        self.buckets.slot_mut(index)?.as_mut().map(|entry| &mut entry.value)
    }

    /// Returns `true` if `key` has a live entry
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.live_index(key).is_some()
    }

    /// Marks the entry for `key` as deleted.
    ///
    /// Returns `false` when the key was not present. The slot stays
    /// occupied until a later `put` reuses it or the table is resized.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(entry) = self
            .buckets
            .iter_mut()
            .flatten()
            .find(|entry| !entry.tombstone && entry.key == key)
        else {
            return false;
        };

        entry.tombstone = true;
        self.size = self.size.saturating_sub(1);
        true
    }

    /// Rebuilds the table with at least `new_capacity` buckets.
    ///
    /// Ignored when `new_capacity <= len()`. A prime request is used as is,
    /// anything else is rounded up to the next prime. Live entries are
    /// re-inserted with [`put`](Self::put), so the table may grow past the
    /// request to keep the load factor at or below 0.5. Tombstones are
    /// dropped.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity <= self.size {
            return;
        }

        let target = resize_target(new_capacity);
        debug!(
            "resizing open addressing table from {} to {} buckets ({} live entries)",
            self.capacity(),
            target,
            self.size
        );

        let old = mem::replace(&mut self.buckets, BucketStore::new(target));
        self.size = 0;
        for entry in old.into_iter().flatten().filter(|entry| !entry.tombstone) {
            self.put(entry.key, entry.value);
        }
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if there are no live entries
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

    /// Returns `capacity - len`; tombstones count as occupied
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.capacity().saturating_sub(self.size)
    }

    /// Removes every entry, keeping the current capacity
    pub fn clear(&mut self) {
        debug!("clearing open addressing table ({} live entries)", self.size);
        self.buckets = BucketStore::new(self.capacity());
        self.size = 0;
    }

    /// Live key-value pairs in bucket order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }

    /// Returns an iterator over the live key-value pairs in bucket order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.as_slice(), index: 0 }
    }
}

impl<'a, V, H: KeyHasher> IntoIterator for &'a OpenAddressingMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One line per bucket: `index: None` or `index: K: key V: value TS: tombstone`
impl<V: fmt::Display, H> fmt::Display for OpenAddressingMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.buckets.iter().enumerate() {
            match slot {
                None => writeln!(f, "{index}: None")?,
                Some(entry) => writeln!(
                    f,
                    "{index}: K: {} V: {} TS: {}",
                    entry.key, entry.value, entry.tombstone
                )?,
            }
        }
        Ok(())
    }
}

/// Iterator over the live key-value pairs of an [`OpenAddressingMap`]
#[derive(Debug)]
pub struct Iter<'a, V> {
    /// Reference to the buckets in the hash map
    buckets: &'a [Option<Entry<V>>],
    /// Current position in the iteration
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.buckets.get(self.index) {
            self.index = self.index.saturating_add(1);
            if let Some(entry) = slot.as_ref().filter(|entry| !entry.tombstone) {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }
}

impl<V> FusedIterator for Iter<'_, V> {}
