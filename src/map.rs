//! Persistent CHAMP map handle.

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::ops;

use archery::{ArcK, RcK, SharedPointer, SharedPointerKind};

use crate::edit::Edit;
use crate::hash::{self, DefaultHashBuilder};
use crate::iter::{Iter, Keys, Values};
use crate::node::{Entry, NodeRef};
use crate::ops::get;
use crate::ops::insert::PutOutcome;
use crate::ops::reduce::fold_recursive;
use crate::ops::{put_root, remove_root};
use crate::transient::TransientChampMap;

/// Persistent hash map based on a CHAMP trie.
///
/// A map value is a handle to an immutable root node. [`put`](Self::put)
/// and [`remove`](Self::remove) return new handles that share every
/// unmodified subtree with the original; the original stays valid and
/// unchanged. Cloning a handle is O(1).
///
/// `P` selects the reference-counting pointer (see [`ChampMap`] and
/// [`ChampMapSync`]); `S` builds the hasher that supplies each key's
/// 32-bit hash.
pub struct GenericChampMap<K, V, P: SharedPointerKind, S = DefaultHashBuilder> {
    root: Option<NodeRef<K, V, P>>,
    size: usize,
    hasher: S,
}

/// Single-threaded persistent map (`Rc` nodes).
pub type ChampMap<K, V, S = DefaultHashBuilder> = GenericChampMap<K, V, RcK, S>;

/// Thread-safe persistent map (`Arc` nodes), `Send + Sync` when `K` and `V` are.
pub type ChampMapSync<K, V, S = DefaultHashBuilder> = GenericChampMap<K, V, ArcK, S>;

// ---------------------------------------------------------------------------
// Construction & accessors (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V, P: SharedPointerKind> GenericChampMap<K, V, P> {
    /// Creates an empty map using the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, P: SharedPointerKind, S> GenericChampMap<K, V, P, S> {
    /// Creates an empty map that hashes keys with `hasher`.
    #[must_use]
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            root: None,
            size: 0,
            hasher,
        }
    }

    pub(crate) const fn from_parts(root: Option<NodeRef<K, V, P>>, size: usize, hasher: S) -> Self {
        Self { root, size, hasher }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the hash builder.
    #[must_use]
    pub const fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns `true` if both handles point at the same root node.
    ///
    /// Identical roots imply equal contents; the converse does not hold.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => SharedPointer::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Option<&NodeRef<K, V, P>> {
        self.root.as_ref()
    }

    /// Returns an iterator over `(&K, &V)` pairs.
    ///
    /// Order follows hash fragments and is not stable across hashers.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, P> {
        Iter::new(self.root.as_deref(), self.size)
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, P> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V, P> {
        Values { inner: self.iter() }
    }

    /// Folds `f` over every key-value pair, depth first.
    pub fn fold_with_key<T, F>(&self, seed: T, mut f: F) -> T
    where
        F: FnMut(T, &K, &V) -> T,
    {
        match self.root.as_deref() {
            Some(root) => fold_recursive(root, seed, &mut f),
            None => seed,
        }
    }

    /// Folds `f` over every value, in the order of [`fold_with_key`](Self::fold_with_key).
    pub fn fold<T, F>(&self, seed: T, mut f: F) -> T
    where
        F: FnMut(T, &V) -> T,
    {
        self.fold_with_key(seed, |acc, _, v| f(acc, v))
    }
}

// ---------------------------------------------------------------------------
// Read operations: K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V, P: SharedPointerKind, S: BuildHasher> GenericChampMap<K, V, P, S> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let root = self.root.as_deref()?;
        get::lookup(root, hash::hash_key(&self.hasher, key), key, 0)
    }

    /// Returns the value for `key`, or `not_found` if the key is absent.
    #[must_use]
    pub fn lookup<'a>(&'a self, key: &K, not_found: &'a V) -> &'a V {
        self.get(key).unwrap_or(not_found)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations: K: Hash + Eq + Clone, V: Clone + PartialEq
// ---------------------------------------------------------------------------

impl<K, V, P, S> GenericChampMap<K, V, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
    P: SharedPointerKind,
    S: BuildHasher + Clone,
{
    /// Returns a map with `key` bound to `value`.
    ///
    /// Only the path from the root to the key is copied. If `key` already
    /// maps to an equal value, the returned handle is [`ptr_eq`](Self::ptr_eq)
    /// to `self`.
    #[must_use]
    pub fn put(&self, key: K, value: V) -> Self {
        let mut next = self.clone();
        next.put_mut(key, value);
        next
    }

    /// Returns a map without `key`.
    ///
    /// If `key` is absent, the returned handle is [`ptr_eq`](Self::ptr_eq)
    /// to `self`.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let mut next = self.clone();
        next.remove_mut(key);
        next
    }

    /// Binds `key` to `value` in this handle.
    ///
    /// Returns `true` if the key was new. Other handles sharing structure
    /// with this one are unaffected.
    pub fn put_mut(&mut self, key: K, value: V) -> bool {
        let hash = hash::hash_key(&self.hasher, &key);
        let outcome = put_root(&mut self.root, Entry { hash, key, value }, Edit::new());
        if outcome == PutOutcome::Inserted {
            self.size += 1;
        }
        outcome == PutOutcome::Inserted
    }

    /// Removes `key` from this handle. Returns `true` if it was present.
    pub fn remove_mut(&mut self, key: &K) -> bool {
        let hash = hash::hash_key(&self.hasher, key);
        let removed = remove_root(&mut self.root, hash, key, Edit::new());
        if removed {
            self.size -= 1;
        }
        removed
    }

    /// Starts a transient session seeded with this map's contents.
    ///
    /// The session edits its own nodes in place; `self` is never affected.
    #[must_use]
    pub fn transient(&self) -> TransientChampMap<K, V, P, S> {
        TransientChampMap::from_parts(self.root.clone(), self.size, self.hasher.clone())
    }

    /// Returns a map with every pair of `source` added, `source` winning on
    /// shared keys.
    #[must_use]
    pub fn merge(&self, source: &Self) -> Self {
        if self.is_empty() {
            return source.clone();
        }
        source
            .fold_with_key(self.transient(), |mut acc, k, v| {
                acc.insert(k.clone(), v.clone());
                acc
            })
            .persistent()
    }

    /// Returns a map of the pairs whose value satisfies `predicate`.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V) -> bool,
    {
        self.filter_with_key(|_, v| predicate(v))
    }

    /// Returns a map of the pairs satisfying `predicate`.
    #[must_use]
    pub fn filter_with_key<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.fold_with_key(
            TransientChampMap::with_hasher(self.hasher.clone()),
            |mut acc, k, v| {
                if predicate(k, v) {
                    acc.insert(k.clone(), v.clone());
                }
                acc
            },
        )
        .persistent()
    }

    /// Returns a map with every value replaced by `f(value)`.
    #[must_use]
    pub fn map_values<W, F>(&self, mut f: F) -> GenericChampMap<K, W, P, S>
    where
        W: Clone + PartialEq,
        F: FnMut(&V) -> W,
    {
        self.map_with_key(|_, v| f(v))
    }

    /// Returns a map with every value replaced by `f(key, value)`.
    #[must_use]
    pub fn map_with_key<W, F>(&self, mut f: F) -> GenericChampMap<K, W, P, S>
    where
        W: Clone + PartialEq,
        F: FnMut(&K, &V) -> W,
    {
        self.fold_with_key(
            TransientChampMap::with_hasher(self.hasher.clone()),
            |mut acc, k, v| {
                acc.insert(k.clone(), f(k, v));
                acc
            },
        )
        .persistent()
    }
}

impl<K, V, P, S> GenericChampMap<K, V, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
    P: SharedPointerKind,
    S: BuildHasher + Clone + Default,
{
    /// Creates a map holding the single pair `key → value`.
    #[must_use]
    pub fn unit(key: K, value: V) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.put_mut(key, value);
        map
    }

    /// Builds a map from the `n` pairs `f(0), f(1), …, f(n - 1)` in one
    /// transient session.
    #[must_use]
    pub fn from_fn<F>(n: usize, f: F) -> Self
    where
        F: FnMut(usize) -> (K, V),
    {
        (0..n).map(f).collect()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V, P: SharedPointerKind, S: Clone> Clone for GenericChampMap<K, V, P, S> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, P: SharedPointerKind, S: Default> Default for GenericChampMap<K, V, P, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, P: SharedPointerKind, S> fmt::Debug
    for GenericChampMap<K, V, P, S>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, P, S> PartialEq for GenericChampMap<K, V, P, S>
where
    K: Hash + Eq,
    V: PartialEq,
    P: SharedPointerKind,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        self.ptr_eq(other) || self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, P, S> Eq for GenericChampMap<K, V, P, S>
where
    K: Hash + Eq,
    V: Eq,
    P: SharedPointerKind,
    S: BuildHasher,
{
}

impl<K, V, P, S> Extend<(K, V)> for GenericChampMap<K, V, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
    P: SharedPointerKind,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let mut transient = self.transient();
        transient.extend(iter);
        *self = transient.persistent();
    }
}

impl<K, V, P, S> FromIterator<(K, V)> for GenericChampMap<K, V, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
    P: SharedPointerKind,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut transient = TransientChampMap::with_hasher(S::default());
        transient.extend(iter);
        transient.persistent()
    }
}

impl<K: Hash + Eq, V, P: SharedPointerKind, S: BuildHasher> ops::Index<&K>
    for GenericChampMap<K, V, P, S>
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V, P: SharedPointerKind, S> IntoIterator for &'a GenericChampMap<K, V, P, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Iter<'a, K, V, P> {
        self.iter()
    }
}
