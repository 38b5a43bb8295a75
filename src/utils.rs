//! Utility traits shared by both map implementations

use crate::{ChainingMap, KeyHasher, OpenAddressingMap};

/// Extension trait for map implementations that provides owned snapshots
pub trait HashMapExtensions<V> {
    /// Returns the keys of the hash map as a Vec
    fn keys(&self) -> Vec<String>;

    /// Returns the values of the hash map as a Vec
    fn values(&self) -> Vec<V>;
}

impl<V: Clone, H: KeyHasher> HashMapExtensions<V> for OpenAddressingMap<V, H> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_string()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<V: Clone, H: KeyHasher> HashMapExtensions<V> for ChainingMap<V, H> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_string()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}
