use std::{borrow::Borrow, collections::HashMap, hash::Hash};

use strand_shared::ActorId;

// MultiIndex
/// A one-to-many secondary index over actor ids. Buckets are dropped as soon
/// as they become empty.
pub struct MultiIndex<K: Eq + Hash> {
    inner: HashMap<K, Vec<ActorId>>,
}

impl<K: Eq + Hash> MultiIndex<K> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> &[ActorId]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    pub fn insert(&mut self, key: K, id: ActorId) {
        self.inner.entry(key).or_default().push(id);
    }

    /// Removes one mapping, returning false when it did not exist
    pub fn remove<Q>(&mut self, key: &Q, id: ActorId) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(ids) = self.inner.get_mut(key) else {
            return false;
        };
        let Some(index) = ids.iter().position(|other| *other == id) else {
            return false;
        };
        ids.remove(index);
        if ids.is_empty() {
            self.inner.remove(key);
        }
        true
    }

    /// Number of non-empty buckets
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[ActorId])> {
        self.inner.iter().map(|(key, ids)| (key, ids.as_slice()))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K: Eq + Hash> Default for MultiIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}
