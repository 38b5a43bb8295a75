//! Singly linked list used as the per-bucket chain of [`ChainingMap`].
//!
//! [`ChainingMap`]: crate::ChainingMap

use std::fmt;

/// A node in a bucket chain
#[derive(Debug, Clone)]
struct Node<V> {
    /// The key of the entry
    key: String,
    /// The value associated with the key
    value: V,
    /// The rest of the chain
    next: Option<Box<Node<V>>>,
}

/// Owned chain of entries sharing one bucket index.
///
/// New entries go to the front. Keys are unique within a chain; the map
/// checks for an existing key before inserting.
#[derive(Debug, Clone)]
pub(crate) struct Chain<V> {
    /// First node, `None` for an empty chain
    head: Option<Box<Node<V>>>,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self { head: None }
    }
}

impl<V> Chain<V> {
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Pushes a new entry at the front of the chain.
    pub(crate) fn insert(&mut self, key: String, value: V) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
    }

    pub(crate) fn find(&self, key: &str) -> Option<&V> {
        let mut current = self.head.as_deref();
        while let Some(node) = current {
            if node.key == key {
                return Some(&node.value);
            }
            current = node.next.as_deref();
        }
        None
    }

    pub(crate) fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut current = self.head.as_deref_mut();
        while let Some(node) = current {
            if node.key == key {
                return Some(&mut node.value);
            }
            current = node.next.as_deref_mut();
        }
        None
    }

    /// Unlinks the node holding `key` and returns its value.
    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| node.key != key) {
            link = &mut link.as_mut()?.next;
        }

        let removed = link.take()?;
        let Node { value, next, .. } = *removed;
        *link = next;
        Some(value)
    }

    /// Detaches the first entry, used to move nodes during a rehash.
    pub(crate) fn pop_front(&mut self) -> Option<(String, V)> {
        let node = self.head.take()?;
        let Node { key, value, next } = *node;
        self.head = next;
        Some((key, value))
    }

    pub(crate) fn iter(&self) -> ChainIter<'_, V> {
        ChainIter { next: self.head.as_deref() }
    }
}

impl<V> Drop for Chain<V> {
    // Unlink iteratively so a long chain cannot overflow the stack.
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(mut node) = current {
            current = node.next.take();
        }
    }
}

impl<V: fmt::Display> fmt::Display for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "-> ({key}: {value})")?;
            first = false;
        }
        Ok(())
    }
}

/// Borrowing iterator over one chain, front to back.
#[derive(Debug)]
pub(crate) struct ChainIter<'a, V> {
    /// Node to yield next
    next: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some((node.key.as_str(), &node.value))
    }
}
