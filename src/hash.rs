//! Key hashing.
//!
//! The trie consumes a 32-bit hash per key. Any [`BuildHasher`] can supply
//! it; the trie never assumes a particular algorithm, only that equal keys
//! hash equally and that a key's hash does not change while it is stored.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::ops::Deref;

use rustc_hash::FxHashMap;

/// 32-bit hash code consumed five bits per trie level.
pub type HashCode = u32;

/// Default hash builder: SipHash with fixed keys, deterministic across runs.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// Builds [`StringHasher`]s.
pub type StringHashBuilder = BuildHasherDefault<StringHasher>;

/// Builds [`StringKeyHasher`]s; pairs with [`StringKey`] map keys.
pub type StringKeyHashBuilder = BuildHasherDefault<StringKeyHasher>;

/// Strings at or below this length are hashed directly, never cached.
pub const CACHE_MIN_LEN: usize = 16;

/// Entries a [`StringHashCache`] holds before it is cleared.
pub const CACHE_CAPACITY: usize = 255;

/// Computes the trie hash of `key` with the hash builder `builder`.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn hash_key<K: Hash + ?Sized, S: BuildHasher>(builder: &S, key: &K) -> HashCode {
    builder.hash_one(key) as HashCode
}

/// Polynomial hash, `h = 31·h + byte`, over every byte written to it.
///
/// Cheap and stable; distribution is adequate for trie fan-out but offers
/// no resistance to crafted collisions.
///
/// `str`'s `Hash` impl writes a `0xFF` terminator after the UTF-8 bytes, and
/// this hasher folds it in like any other byte, so for a `&str` or `String`
/// key `hash_key(&StringHashBuilder::default(), s)` equals
/// `31·hash_string(s) + 0xFF` (wrapping), not [`hash_string`]`(s)`. Use
/// [`StringKey`] with [`StringKeyHashBuilder`] for keys hashed exactly by
/// [`hash_string`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StringHasher {
    hash: HashCode,
}

impl Hasher for StringHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = self.hash.wrapping_mul(31).wrapping_add(HashCode::from(b));
        }
    }

    fn finish(&self) -> u64 {
        u64::from(self.hash)
    }
}

/// Hashes the UTF-8 bytes of `s` with `h = 31·h + byte`, no terminator.
#[must_use]
pub fn hash_string(s: &str) -> HashCode {
    let mut hasher = StringHasher::default();
    hasher.write(s.as_bytes());
    hasher.hash
}

/// Memoises [`hash_string`] for long strings.
///
/// Short strings are cheaper to rehash than to look up. When the cache
/// reaches [`CACHE_CAPACITY`] entries it is dropped wholesale and refilled.
#[derive(Debug, Default)]
pub struct StringHashCache {
    hashes: FxHashMap<Box<str>, HashCode>,
}

impl StringHashCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the hash of `s`, computing and caching it if needed.
    pub fn hash(&mut self, s: &str) -> HashCode {
        if s.len() <= CACHE_MIN_LEN {
            return hash_string(s);
        }
        if let Some(&hash) = self.hashes.get(s) {
            return hash;
        }
        let hash = hash_string(s);
        if self.hashes.len() == CACHE_CAPACITY {
            self.hashes.clear();
        }
        self.hashes.insert(s.into(), hash);
        hash
    }

    /// Number of cached hashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

thread_local! {
    static STRING_HASHES: RefCell<StringHashCache> = RefCell::new(StringHashCache::new());
}

/// [`hash_string`] memoised in this thread's [`StringHashCache`].
#[must_use]
pub fn cached_hash_string(s: &str) -> HashCode {
    STRING_HASHES.with(|cache| cache.borrow_mut().hash(s))
}

#[cfg(test)]
pub(crate) fn cached_string_count() -> usize {
    STRING_HASHES.with(|cache| cache.borrow().len())
}

/// String map key whose hash is exactly [`hash_string`] of its text.
///
/// Hashing goes through [`cached_hash_string`], so long keys are hashed once
/// per thread until the cache is recycled. Pair it with
/// [`StringKeyHashBuilder`], which passes the code through unchanged.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StringKey(Box<str>);

impl StringKey {
    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Hash for StringKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(cached_hash_string(&self.0));
    }
}

impl Deref for StringKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StringKey {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for StringKey {
    fn from(s: String) -> Self {
        Self(s.into_boxed_str())
    }
}

impl fmt::Debug for StringKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Hasher that returns a precomputed [`HashCode`] unchanged.
///
/// A `write_u32` sets the code. Any other input is folded in with the
/// [`StringHasher`] recurrence, so other key types still hash consistently.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringKeyHasher {
    hash: HashCode,
}

impl Hasher for StringKeyHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = self.hash.wrapping_mul(31).wrapping_add(HashCode::from(b));
        }
    }

    fn write_u32(&mut self, code: u32) {
        self.hash = code;
    }

    fn finish(&self) -> u64 {
        u64::from(self.hash)
    }
}
