//! Fixed-length slot array backing both engines.

/// `capacity` slots, built in one go and replaced wholesale on resize.
///
/// Indices handed to the store always come from `hash % capacity`, so the
/// checked accessors never miss in practice; a miss is treated as an empty
/// slot rather than a panic.
#[derive(Debug, Clone)]
pub(crate) struct BucketStore<S> {
    /// The slots, never grown or shrunk in place
    slots: Box<[S]>,
}

impl<S: Default> BucketStore<S> {
    /// Builds a store of `capacity` default (empty) slots.
    pub(crate) fn new(capacity: usize) -> Self {
        Self { slots: std::iter::repeat_with(S::default).take(capacity).collect() }
    }
}

impl<S> BucketStore<S> {
    /// Number of slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&S> {
        self.slots.get(index)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut S> {
        self.slots.get_mut(index)
    }

    /// Slots in ascending index order.
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, S> {
        self.slots.iter()
    }

    /// Mutable slots in ascending index order.
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, S> {
        self.slots.iter_mut()
    }

    /// Borrowed view, used by iterators that keep their own cursor.
    pub(crate) fn as_slice(&self) -> &[S] {
        &self.slots
    }
}

impl<S> IntoIterator for BucketStore<S> {
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_vec().into_iter()
    }
}
