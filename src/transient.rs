//! Transient sessions: batched in-place construction of a CHAMP map.

use std::fmt;
use std::hash::{BuildHasher, Hash};

use archery::SharedPointerKind;

use crate::edit::Edit;
use crate::hash::{self, DefaultHashBuilder};
use crate::map::GenericChampMap;
use crate::node::{Entry, NodeRef};
use crate::ops::get;
use crate::ops::insert::PutOutcome;
use crate::ops::{put_root, remove_root};

/// Mutable builder for a [`GenericChampMap`].
///
/// Holds one session token for its whole lifetime. Nodes it allocates carry
/// that token and are edited in place by later calls instead of being
/// copied; nodes inherited from a persistent map are copied on first write.
/// [`persistent`](Self::persistent) ends the session and freezes every node.
///
/// The builder is only mutated through `&mut self`, so a session always has
/// a single owner.
pub struct TransientChampMap<K, V, P: SharedPointerKind, S = DefaultHashBuilder> {
    root: Option<NodeRef<K, V, P>>,
    size: usize,
    hasher: S,
    edit: Edit,
}

impl<K, V, P: SharedPointerKind> TransientChampMap<K, V, P> {
    /// Starts an empty session using the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, P: SharedPointerKind, S> TransientChampMap<K, V, P, S> {
    /// Starts an empty session that hashes keys with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(None, 0, hasher)
    }

    pub(crate) fn from_parts(root: Option<NodeRef<K, V, P>>, size: usize, hasher: S) -> Self {
        Self {
            root,
            size,
            hasher,
            edit: Edit::new(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Option<&NodeRef<K, V, P>> {
        self.root.as_ref()
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the builder holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Ends the session and returns the built map.
    #[must_use]
    pub fn persistent(self) -> GenericChampMap<K, V, P, S> {
        GenericChampMap::from_parts(self.root, self.size, self.hasher)
    }
}

impl<K: Hash + Eq, V, P: SharedPointerKind, S: BuildHasher> TransientChampMap<K, V, P, S> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let root = self.root.as_deref()?;
        get::lookup(root, hash::hash_key(&self.hasher, key), key, 0)
    }

    /// Returns `true` if the builder contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V, P, S> TransientChampMap<K, V, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
    P: SharedPointerKind,
    S: BuildHasher,
{
    /// Binds `key` to `value`. Returns `true` if the key was new.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = hash::hash_key(&self.hasher, &key);
        let outcome = put_root(&mut self.root, Entry { hash, key, value }, self.edit);
        if outcome == PutOutcome::Inserted {
            self.size += 1;
        }
        outcome == PutOutcome::Inserted
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let hash = hash::hash_key(&self.hasher, key);
        let removed = remove_root(&mut self.root, hash, key, self.edit);
        if removed {
            self.size -= 1;
        }
        removed
    }
}

impl<K, V, P: SharedPointerKind, S: Default> Default for TransientChampMap<K, V, P, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, P, S> Extend<(K, V)> for TransientChampMap<K, V, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
    P: SharedPointerKind,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, P: SharedPointerKind, S> fmt::Debug for TransientChampMap<K, V, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientChampMap")
            .field("len", &self.size)
            .field("edit", &self.edit)
            .finish_non_exhaustive()
    }
}
