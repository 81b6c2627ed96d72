//! Mutable object store: a mapping from caller-supplied ids to rectangles.
//!
//! Queries never see the store directly; they read a [`Snapshot`], which borrows
//! the store immutably, so no insert or delete can run while a query holds one.

use std::collections::HashMap;
use std::collections::hash_map;

use crate::error::{OracleError, Result};
use crate::geometry::Rect;

/// Stable, caller-supplied object identifier
pub type ObjectId = i64;

/// Current set of live objects, keyed by id
#[derive(Clone, Debug)]
pub struct ObjectStore<const D: usize = 2> {
    objects: HashMap<ObjectId, Rect<D>>,
}

impl<const D: usize> ObjectStore<D> {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new store with preallocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts `id`, or replaces its rectangle if it is already present.
    ///
    /// Returns the previous rectangle when this was a replacement.
    pub fn insert(&mut self, id: ObjectId, rect: Rect<D>) -> Option<Rect<D>> {
        self.objects.insert(id, rect)
    }

    /// Removes `id` from the store.
    ///
    /// Deleting an id that was never inserted means the workload is corrupt, so
    /// this fails with [`OracleError::NotFound`] instead of being ignored. The
    /// error carries a zero position; the replay driver fills in the real one.
    ///
    /// # Errors
    ///
    /// [`OracleError::NotFound`] if `id` is not in the store.
    pub fn delete(&mut self, id: ObjectId) -> Result<Rect<D>> {
        self.objects.remove(&id).ok_or(OracleError::NotFound {
            op_index: 0,
            line: 0,
            id,
        })
    }

    /// Returns the rectangle stored under `id`
    pub fn get(&self, id: ObjectId) -> Option<&Rect<D>> {
        self.objects.get(&id)
    }

    /// Returns whether `id` is live
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Returns the number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Fixed read view for the duration of one query
    pub fn snapshot(&self) -> Snapshot<'_, D> {
        Snapshot {
            objects: &self.objects,
        }
    }
}

impl<const D: usize> Default for ObjectStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of the store's contents.
///
/// Iteration order is unspecified.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a, const D: usize = 2> {
    objects: &'a HashMap<ObjectId, Rect<D>>,
}

impl<'a, const D: usize> Snapshot<'a, D> {
    /// Iterates over `(id, rect)` pairs in unspecified order
    pub fn iter(&self) -> SnapshotIter<'a, D> {
        SnapshotIter {
            inner: self.objects.iter(),
        }
    }

    /// Number of objects in the view
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the view holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<'a, const D: usize> IntoIterator for Snapshot<'a, D> {
    type Item = (ObjectId, &'a Rect<D>);
    type IntoIter = SnapshotIter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(id, rect)` pairs of a [`Snapshot`]
#[derive(Clone, Debug)]
pub struct SnapshotIter<'a, const D: usize = 2> {
    inner: hash_map::Iter<'a, ObjectId, Rect<D>>,
}

impl<'a, const D: usize> Iterator for SnapshotIter<'a, D> {
    type Item = (ObjectId, &'a Rect<D>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&id, rect)| (id, rect))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<const D: usize> ExactSizeIterator for SnapshotIter<'_, D> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = ObjectStore::<2>::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.snapshot().iter().count(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = ObjectStore::new();
        assert!(store.insert(1, Rect::from_xy(0.0, 0.0, 1.0, 1.0)).is_none());
        assert!(store.insert(2, Rect::from_xy(2.0, 2.0, 3.0, 3.0)).is_none());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(&Rect::from_xy(0.0, 0.0, 1.0, 1.0)));
        assert!(store.contains(2));
        assert!(!store.contains(3));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut store = ObjectStore::new();
        let _ = store.insert(7, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
        let previous = store.insert(7, Rect::from_xy(10.0, 10.0, 11.0, 11.0));

        assert_eq!(previous, Some(Rect::from_xy(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(7), Some(&Rect::from_xy(10.0, 10.0, 11.0, 11.0)));
    }

    #[test]
    fn test_delete_removes() {
        let mut store = ObjectStore::new();
        let _ = store.insert(5, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
        let removed = store.delete(5).expect("id 5 is present");
        assert_eq!(removed, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut store = ObjectStore::<2>::new();
        let _ = store.insert(1, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
        match store.delete(99) {
            Err(OracleError::NotFound { id, .. }) => assert_eq!(id, 99),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert_eq!(store.len(), 1, "failed delete must not change the store");
    }

    #[test]
    fn test_delete_twice_fails_second_time() {
        let mut store = ObjectStore::new();
        let _ = store.insert(3, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
        assert!(store.delete(3).is_ok());
        assert!(store.delete(3).is_err());
    }

    #[test]
    fn test_snapshot_sees_all_objects() {
        let mut store = ObjectStore::new();
        for id in 0..50 {
            let v = id as f64;
            let _ = store.insert(id, Rect::from_xy(v, v, v + 1.0, v + 1.0));
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 50);
        assert_eq!(snapshot.iter().len(), 50);

        let mut ids: Vec<ObjectId> = snapshot.into_iter().map(|(id, _)| id).collect();
        ids.sort();
        assert_eq!(ids, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_negative_ids() {
        let mut store = ObjectStore::new();
        let _ = store.insert(-1, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
        assert!(store.contains(-1));
        assert!(store.delete(-1).is_ok());
    }
}
