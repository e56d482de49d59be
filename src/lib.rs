//! Immutable persistent hash map based on CHAMP.
//!
//! CHAMP (Compressed Hash-Array Mapped Prefix-tree) is a refined HAMT that
//! keeps inline entries and child subtrees in two separate bitmaps per node
//! and compacts the trie on every removal, so the same set of key-value
//! pairs always produces the same structure.
//!
//! # Key properties
//!
//! - **Persistence**: `put`/`remove` return new maps; old handles never change
//! - **Structural sharing**: an update copies only the O(log₃₂ n) nodes on its path
//! - **Identity-preserving no-ops**: re-putting an equal value or removing an
//!   absent key returns a handle to the very same root
//! - **Transients**: batched construction edits session-owned nodes in place
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! ```
//! use champ_map::ChampMap;
//!
//! let m0: ChampMap<&str, &str> = ChampMap::new();
//! let m1 = m0.put("a", "1");
//! let m2 = m1.put("b", "2");
//!
//! assert_eq!(m2.lookup(&"a", &"?"), &"1");
//! assert_eq!(m0.lookup(&"a", &"?"), &"?");
//! ```
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015, "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001, "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod edit;
pub mod hash;
pub mod iter;
pub mod node;

mod map;
mod ops;
mod transient;

#[cfg(test)]
mod tests;

pub use archery::{ArcK, RcK, SharedPointerKind};

pub use map::{ChampMap, ChampMapSync, GenericChampMap};
pub use transient::TransientChampMap;
