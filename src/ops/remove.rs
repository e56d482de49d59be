//! Removal operation: path-copying delete with canonical inlining.

use archery::{SharedPointer, SharedPointerKind};

use crate::edit::Edit;
use crate::hash::HashCode;
use crate::node::{self, Node, NodeRef};

/// Removes `key` from the subtree held by `slot`.
///
/// Returns `false` if the key was not present, in which case `slot` still
/// points at the original node. A non-root subtree never empties: once it
/// is down to a single entry its parent hoists that entry.
pub fn remove_recursive<K, V, P>(
    slot: &mut NodeRef<K, V, P>,
    hash: HashCode,
    key: &K,
    shift: u32,
    edit: Edit,
) -> bool
where
    K: Eq + Clone,
    V: Clone,
    P: SharedPointerKind,
{
    match &**slot {
        Node::Branch {
            data_map,
            node_map,
            entries,
            ..
        } => {
            let bit = node::bitpos(hash, shift);

            if data_map & bit != 0 {
                let pos = node::index(*data_map, bit);
                let e = &entries[pos];
                if e.hash != hash || e.key != *key {
                    return false;
                }
                let Node::Branch {
                    data_map, entries, ..
                } = node::editable(slot, edit)
                else {
                    unreachable!("branch copy changed variant");
                };
                entries.remove(pos);
                *data_map &= !bit;
                true
            } else if node_map & bit != 0 {
                let pos = node::index(*node_map, bit);
                remove_from_child(slot, bit, pos, hash, key, shift, edit)
            } else {
                false
            }
        }
        Node::Collision {
            hash: node_hash,
            entries,
            ..
        } => {
            if hash != *node_hash {
                return false;
            }
            let Some(i) = entries.iter().position(|e| e.key == *key) else {
                return false;
            };

            if entries.len() == 2 {
                // One pair left: hand back the form a put into an empty trie
                // would build. The parent branch hoists it.
                let remaining = entries[1 - i].clone();
                *slot = SharedPointer::new(Node::singleton(edit, remaining, 0));
                return true;
            }

            let Node::Collision { entries, .. } = node::editable(slot, edit) else {
                unreachable!("collision copy changed variant");
            };
            entries.remove(i);
            true
        }
    }
}

fn remove_from_child<K, V, P>(
    slot: &mut NodeRef<K, V, P>,
    bit: u32,
    pos: usize,
    hash: HashCode,
    key: &K,
    shift: u32,
    edit: Edit,
) -> bool
where
    K: Eq + Clone,
    V: Clone,
    P: SharedPointerKind,
{
    let child_shift = shift + node::BITS_PER_LEVEL;

    if edit.owns(slot.edit()) {
        let Node::Branch { children, .. } = node::editable(slot, edit) else {
            unreachable!("branch copy changed variant");
        };
        if !remove_recursive(&mut children[pos], hash, key, child_shift, edit) {
            return false;
        }
    } else {
        let Node::Branch { children, .. } = &**slot else {
            unreachable!("child index into a collision node");
        };
        let mut child = SharedPointer::clone(&children[pos]);
        if !remove_recursive(&mut child, hash, key, child_shift, edit) {
            return false;
        }
        let Node::Branch { children, .. } = node::editable(slot, edit) else {
            unreachable!("branch copy changed variant");
        };
        children[pos] = child;
    }

    compact_child(slot, bit, pos, shift, edit);
    true
}

/// Restores the canonical form after the child at `pos` shrank.
///
/// A child reduced to one entry is inlined into this branch. If that child
/// was this branch's only occupant, the child itself replaces the branch so
/// the entry keeps travelling up; the root instead inlines it, since its
/// bit positions are the final ones.
fn compact_child<K, V, P>(slot: &mut NodeRef<K, V, P>, bit: u32, pos: usize, shift: u32, edit: Edit)
where
    K: Clone,
    V: Clone,
    P: SharedPointerKind,
{
    let Node::Branch {
        data_map,
        node_map,
        entries,
        children,
        ..
    } = node::editable(slot, edit)
    else {
        unreachable!("branch copy changed variant");
    };

    if children[pos].is_empty() {
        children.remove(pos);
        *node_map &= !bit;
        return;
    }
    if children[pos].single_entry().is_none() {
        return;
    }

    if shift > 0 && *data_map == 0 && children.len() == 1 {
        let only = children.remove(pos);
        *slot = only;
        return;
    }

    let child = children.remove(pos);
    *node_map &= !bit;
    if let Some(single) = child.single_entry() {
        *data_map |= bit;
        entries.insert(node::index(*data_map, bit), single.clone());
    }
}
