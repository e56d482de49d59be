//! CHAMP trie node types and bitmap helpers.

use std::fmt;

use archery::{SharedPointer, SharedPointerKind};

use crate::edit::Edit;
use crate::hash::HashCode;

/// Bits per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Maximum bit-shift value (depth 6, last level uses the top 2 bits).
///
/// Below this shift every hash bit has been consumed; keys that still share
/// a position are stored in a [`Node::Collision`].
pub const MAX_SHIFT: u32 = 30;

const FRAGMENT_MASK: HashCode = 0x1F;

/// Shared pointer to a node, reference counted by the pointer kind `P`.
pub type NodeRef<K, V, P> = SharedPointer<Node<K, V, P>, P>;

/// Inline entry storing a key-value pair with its precomputed hash.
pub struct Entry<K, V> {
    /// Precomputed 32-bit hash of the key.
    pub hash: HashCode,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// CHAMP trie node.
///
/// The empty trie has no node at all: maps hold `Option<NodeRef>` and use
/// `None` as the canonical empty root.
pub enum Node<K, V, P: SharedPointerKind> {
    /// Bitmap-compressed node for one 5-bit slice of the hash.
    ///
    /// Invariants: `data_map & node_map == 0`,
    /// `entries.len() == popcount(data_map)`,
    /// `children.len() == popcount(node_map)`.
    Branch {
        /// Session that allocated this node.
        edit: Edit,
        /// Bitmap of positions occupied by inline entries.
        data_map: u32,
        /// Bitmap of positions occupied by child subtrees.
        node_map: u32,
        /// Inline entries in bit order.
        entries: Vec<Entry<K, V>>,
        /// Child subtrees in bit order.
        children: Vec<NodeRef<K, V, P>>,
    },
    /// Bucket for keys whose full 32-bit hashes are equal.
    ///
    /// Invariant: `entries.len() >= 2`.
    Collision {
        /// Session that allocated this node.
        edit: Edit,
        /// The shared hash value.
        hash: HashCode,
        /// Colliding entries, searched by key equality.
        entries: Vec<Entry<K, V>>,
    },
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Number of set bits in `bitmap`.
#[inline]
#[must_use]
pub const fn popcount(bitmap: u32) -> usize {
    bitmap.count_ones() as usize
}

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
#[inline]
#[must_use]
pub const fn fragment(hash: HashCode, shift: u32) -> u32 {
    (hash >> shift) & FRAGMENT_MASK
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the bit that `hash` occupies in a node at depth `shift`.
#[inline]
#[must_use]
pub const fn bitpos(hash: HashCode, shift: u32) -> u32 {
    mask(fragment(hash, shift))
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    popcount(bitmap & (bit - 1))
}

// ---------------------------------------------------------------------------
// Node accessors
// ---------------------------------------------------------------------------

impl<K, V, P: SharedPointerKind> Node<K, V, P> {
    /// Builds a branch holding a single inline entry at its position for `shift`.
    #[must_use]
    pub fn singleton(edit: Edit, entry: Entry<K, V>, shift: u32) -> Self {
        Self::Branch {
            edit,
            data_map: bitpos(entry.hash, shift),
            node_map: 0,
            entries: vec![entry],
            children: Vec::new(),
        }
    }

    /// Returns the session tag of this node.
    #[must_use]
    pub const fn edit(&self) -> Edit {
        match self {
            Self::Branch { edit, .. } | Self::Collision { edit, .. } => *edit,
        }
    }

    /// Returns the number of inline data entries.
    #[must_use]
    pub fn data_len(&self) -> usize {
        match self {
            Self::Branch { entries, .. } | Self::Collision { entries, .. } => entries.len(),
        }
    }

    /// Returns the number of child subtrees (always 0 for collision nodes).
    #[must_use]
    pub fn children_len(&self) -> usize {
        match self {
            Self::Branch { children, .. } => children.len(),
            Self::Collision { .. } => 0,
        }
    }

    /// Returns `true` if the subtree holds no entries at all.
    ///
    /// Only a root can reach this state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_len() == 0 && self.children_len() == 0
    }

    /// Returns the sole entry if this subtree collapses to exactly one pair.
    ///
    /// Such a node is never left below a branch: the branch hoists the
    /// entry into its own inline slots.
    #[must_use]
    pub fn single_entry(&self) -> Option<&Entry<K, V>> {
        match self {
            Self::Branch {
                entries, children, ..
            } if entries.len() == 1 && children.is_empty() => entries.first(),
            Self::Collision { entries, .. } if entries.len() == 1 => entries.first(),
            _ => None,
        }
    }
}

/// Returns mutable access to the node in `slot` on behalf of session `edit`.
///
/// A node tagged with another session is replaced by a copy tagged with
/// `edit` first. A node owned by `edit` but also reachable through another
/// pointer is copied by `make_mut`, so edits never leak into shared
/// structure.
pub(crate) fn editable<K, V, P>(slot: &mut NodeRef<K, V, P>, edit: Edit) -> &mut Node<K, V, P>
where
    K: Clone,
    V: Clone,
    P: SharedPointerKind,
{
    if !edit.owns(slot.edit()) {
        let mut copy = (**slot).clone();
        match &mut copy {
            Node::Branch { edit: tag, .. } | Node::Collision { edit: tag, .. } => *tag = edit,
        }
        *slot = SharedPointer::new(copy);
    }
    SharedPointer::make_mut(slot)
}

// ---------------------------------------------------------------------------
// Manual trait impls to avoid a false `P: Clone` bound from derive.
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone> Clone for Entry<K, V> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash,
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> Clone for Node<K, V, P> {
    fn clone(&self) -> Self {
        match self {
            Self::Branch {
                edit,
                data_map,
                node_map,
                entries,
                children,
            } => Self::Branch {
                edit: *edit,
                data_map: *data_map,
                node_map: *node_map,
                entries: entries.clone(),
                children: children.clone(),
            },
            Self::Collision {
                edit,
                hash,
                entries,
            } => Self::Collision {
                edit: *edit,
                hash: *hash,
                entries: entries.clone(),
            },
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("hash", &format_args!("{:#010x}", self.hash))
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<K, V, P: SharedPointerKind> fmt::Debug for Node<K, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch {
                data_map,
                node_map,
                children,
                ..
            } => f
                .debug_struct("Branch")
                .field("data_map", &format_args!("{data_map:#034b}"))
                .field("node_map", &format_args!("{node_map:#034b}"))
                .field("children", children)
                .finish_non_exhaustive(),
            Self::Collision { hash, entries, .. } => f
                .debug_struct("Collision")
                .field("hash", &format_args!("{hash:#010x}"))
                .field("entries_len", &entries.len())
                .finish_non_exhaustive(),
        }
    }
}
