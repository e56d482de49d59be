//! Lookup operation: traverses the trie to find a key.

use archery::SharedPointerKind;

use crate::hash::HashCode;
use crate::node::{self, Node};

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns a reference to the value if found. Never allocates.
pub fn lookup<'a, K, V, P>(
    mut node: &'a Node<K, V, P>,
    hash: HashCode,
    key: &K,
    mut shift: u32,
) -> Option<&'a V>
where
    K: Eq,
    P: SharedPointerKind,
{
    loop {
        match node {
            Node::Branch {
                data_map,
                node_map,
                entries,
                children,
                ..
            } => {
                let bit = node::bitpos(hash, shift);

                if data_map & bit != 0 {
                    // Inline entry is a leaf, not a bucket: no further descent.
                    let entry = &entries[node::index(*data_map, bit)];
                    return (entry.hash == hash && entry.key == *key).then_some(&entry.value);
                }
                if node_map & bit == 0 {
                    return None;
                }
                node = &*children[node::index(*node_map, bit)];
                shift += node::BITS_PER_LEVEL;
            }
            Node::Collision {
                hash: node_hash,
                entries,
                ..
            } => {
                if hash != *node_hash {
                    return None;
                }
                return entries
                    .iter()
                    .find(|e| e.key == *key)
                    .map(|e| &e.value);
            }
        }
    }
}
