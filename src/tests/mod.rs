mod canonical;
mod persistence;

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ptr;

use archery::SharedPointerKind;

use crate::GenericChampMap;
use crate::hash::hash_key;
use crate::node::{self, Node};

/// A key type with a controllable hash value for testing hash collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollidingKey {
    pub id: u32,
    pub forced_hash: u64,
}

impl CollidingKey {
    pub const fn new(id: u32, hash: u64) -> Self {
        Self {
            id,
            forced_hash: hash,
        }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

/// Depth of the deepest node, counting the root as 1; 0 when empty.
pub fn depth<K, V, P: SharedPointerKind, S>(map: &GenericChampMap<K, V, P, S>) -> usize {
    fn node_depth<K, V, P: SharedPointerKind>(node: &Node<K, V, P>) -> usize {
        match node {
            Node::Branch { children, .. } => {
                1 + children.iter().map(|c| node_depth(&**c)).max().unwrap_or(0)
            }
            Node::Collision { .. } => 1,
        }
    }
    map.root().map_or(0, |root| node_depth(&**root))
}

/// Number of collision nodes in the trie.
pub fn collision_nodes<K, V, P: SharedPointerKind, S>(map: &GenericChampMap<K, V, P, S>) -> usize {
    fn count<K, V, P: SharedPointerKind>(node: &Node<K, V, P>) -> usize {
        match node {
            Node::Branch { children, .. } => children.iter().map(|c| count(&**c)).sum(),
            Node::Collision { .. } => 1,
        }
    }
    map.root().map_or(0, |root| count(&**root))
}

/// Addresses of every node reachable from `map`'s root.
pub fn node_addresses<K, V, P: SharedPointerKind, S>(
    map: &GenericChampMap<K, V, P, S>,
) -> HashSet<usize> {
    fn walk<K, V, P: SharedPointerKind>(node: &Node<K, V, P>, out: &mut HashSet<usize>) {
        out.insert(ptr::from_ref(node) as usize);
        if let Node::Branch { children, .. } = node {
            for child in children {
                walk(&**child, out);
            }
        }
    }
    let mut out = HashSet::new();
    if let Some(root) = map.root() {
        walk(&**root, &mut out);
    }
    out
}

/// Checks every structural invariant of the trie and that it holds exactly
/// `map.len()` entries, each reachable by its own hash.
pub fn assert_invariants<K, V, P, S>(map: &GenericChampMap<K, V, P, S>)
where
    K: Hash + Eq + std::fmt::Debug,
    P: SharedPointerKind,
    S: BuildHasher,
{
    fn check<K, V, P, S>(node: &Node<K, V, P>, shift: u32, is_root: bool, hasher: &S) -> usize
    where
        K: Hash + Eq + std::fmt::Debug,
        P: SharedPointerKind,
        S: BuildHasher,
    {
        match node {
            Node::Branch {
                data_map,
                node_map,
                entries,
                children,
                ..
            } => {
                assert_eq!(data_map & node_map, 0, "position both inline and child");
                assert_eq!(entries.len(), node::popcount(*data_map));
                assert_eq!(children.len(), node::popcount(*node_map));
                if !is_root {
                    assert!(
                        entries.len() + children.len() >= 1,
                        "empty branch below the root"
                    );
                    assert!(
                        !(entries.len() == 1 && children.is_empty()),
                        "single-entry branch left below a parent"
                    );
                }

                let mut bits = *data_map;
                for e in entries {
                    let bit = bits & bits.wrapping_neg();
                    bits &= !bit;
                    assert_eq!(e.hash, hash_key(hasher, &e.key), "stale hash for {:?}", e.key);
                    assert_eq!(node::bitpos(e.hash, shift), bit, "entry out of bit order");
                }

                let child_total: usize = children
                    .iter()
                    .map(|c| check(&**c, shift + node::BITS_PER_LEVEL, false, hasher))
                    .sum();
                entries.len() + child_total
            }
            Node::Collision { hash, entries, .. } => {
                assert!(shift > node::MAX_SHIFT, "collision node above full depth");
                assert!(entries.len() >= 2, "collision node with fewer than two pairs");
                for (i, e) in entries.iter().enumerate() {
                    assert_eq!(e.hash, *hash);
                    assert!(
                        entries[i + 1..].iter().all(|o| o.key != e.key),
                        "duplicate key in collision node"
                    );
                }
                entries.len()
            }
        }
    }

    let total = map
        .root()
        .map_or(0, |root| check(&**root, 0, true, map.hasher()));
    assert_eq!(total, map.len(), "reachable entry count must match len");
    if map.is_empty() {
        assert!(map.root().is_none(), "empty map must use the canonical empty root");
    }
}

/// Structural equality of two tries, ignoring session tags and the order of
/// entries inside collision nodes.
pub fn same_shape<K, V, P>(a: &Node<K, V, P>, b: &Node<K, V, P>) -> bool
where
    K: Eq,
    V: PartialEq,
    P: SharedPointerKind,
{
    match (a, b) {
        (
            Node::Branch {
                data_map: dm_a,
                node_map: nm_a,
                entries: e_a,
                children: c_a,
                ..
            },
            Node::Branch {
                data_map: dm_b,
                node_map: nm_b,
                entries: e_b,
                children: c_b,
                ..
            },
        ) => {
            dm_a == dm_b
                && nm_a == nm_b
                && e_a
                    .iter()
                    .zip(e_b)
                    .all(|(x, y)| x.key == y.key && x.value == y.value)
                && c_a.iter().zip(c_b).all(|(x, y)| same_shape(&**x, &**y))
        }
        (
            Node::Collision {
                hash: h_a,
                entries: e_a,
                ..
            },
            Node::Collision {
                hash: h_b,
                entries: e_b,
                ..
            },
        ) => {
            h_a == h_b
                && e_a.len() == e_b.len()
                && e_a
                    .iter()
                    .all(|x| e_b.iter().any(|y| x.key == y.key && x.value == y.value))
        }
        _ => false,
    }
}

/// `same_shape` lifted to whole maps.
pub fn same_map_shape<K, V, P, S>(
    a: &GenericChampMap<K, V, P, S>,
    b: &GenericChampMap<K, V, P, S>,
) -> bool
where
    K: Eq,
    V: PartialEq,
    P: SharedPointerKind,
{
    match (a.root(), b.root()) {
        (Some(x), Some(y)) => same_shape(&**x, &**y),
        (None, None) => true,
        _ => false,
    }
}
