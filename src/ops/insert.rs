//! Insert-or-update: path-copying put with in-place edits for owned nodes.

use archery::{SharedPointer, SharedPointerKind};

use crate::edit::Edit;
use crate::node::{self, Entry, Node, NodeRef};

/// Effect of a put on the key set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    /// The key already mapped to an equal value; the subtree is untouched.
    Unchanged,
    /// The key existed; its value was replaced.
    Updated,
    /// A new key was added.
    Inserted,
}

/// Puts `entry` into the subtree held by `slot`.
///
/// Nodes owned by `edit` are edited in place; any other node on the path is
/// replaced by a copy tagged with `edit`. When the outcome is
/// [`PutOutcome::Unchanged`], `slot` still points at the original node.
pub fn put_recursive<K, V, P>(
    slot: &mut NodeRef<K, V, P>,
    entry: Entry<K, V>,
    shift: u32,
    edit: Edit,
) -> PutOutcome
where
    K: Eq + Clone,
    V: PartialEq + Clone,
    P: SharedPointerKind,
{
    match &**slot {
        Node::Branch {
            data_map,
            node_map,
            entries,
            ..
        } => {
            let bit = node::bitpos(entry.hash, shift);

            if data_map & bit != 0 {
                let pos = node::index(*data_map, bit);
                let existing = &entries[pos];

                if existing.hash == entry.hash && existing.key == entry.key {
                    if existing.value == entry.value {
                        return PutOutcome::Unchanged;
                    }
                    let Node::Branch { entries, .. } = node::editable(slot, edit) else {
                        unreachable!("branch copy changed variant");
                    };
                    entries[pos].value = entry.value;
                    return PutOutcome::Updated;
                }

                // Different key at same position → push both into a subtree.
                let subtree = merge_two_entries(
                    existing.clone(),
                    entry,
                    shift + node::BITS_PER_LEVEL,
                    edit,
                );
                migrate_to_node(slot, bit, subtree, edit);
                PutOutcome::Inserted
            } else if node_map & bit != 0 {
                let pos = node::index(*node_map, bit);
                put_into_child(slot, pos, entry, shift, edit)
            } else {
                let Node::Branch {
                    data_map, entries, ..
                } = node::editable(slot, edit)
                else {
                    unreachable!("branch copy changed variant");
                };
                *data_map |= bit;
                entries.insert(node::index(*data_map, bit), entry);
                PutOutcome::Inserted
            }
        }
        Node::Collision { hash, entries, .. } => {
            debug_assert_eq!(*hash, entry.hash, "collision node reached by a foreign hash");

            match entries.iter().position(|e| e.key == entry.key) {
                Some(i) if entries[i].value == entry.value => PutOutcome::Unchanged,
                Some(i) => {
                    let Node::Collision { entries, .. } = node::editable(slot, edit) else {
                        unreachable!("collision copy changed variant");
                    };
                    entries[i].value = entry.value;
                    PutOutcome::Updated
                }
                None => {
                    let Node::Collision { entries, .. } = node::editable(slot, edit) else {
                        unreachable!("collision copy changed variant");
                    };
                    entries.push(entry);
                    PutOutcome::Inserted
                }
            }
        }
    }
}

/// Recurses into the child at compact index `pos` of the branch in `slot`.
///
/// An owned branch lends its child slot directly so owned children can be
/// edited in place too. A foreign branch is left untouched unless the
/// child actually changed.
fn put_into_child<K, V, P>(
    slot: &mut NodeRef<K, V, P>,
    pos: usize,
    entry: Entry<K, V>,
    shift: u32,
    edit: Edit,
) -> PutOutcome
where
    K: Eq + Clone,
    V: PartialEq + Clone,
    P: SharedPointerKind,
{
    let child_shift = shift + node::BITS_PER_LEVEL;

    if edit.owns(slot.edit()) {
        let Node::Branch { children, .. } = node::editable(slot, edit) else {
            unreachable!("branch copy changed variant");
        };
        return put_recursive(&mut children[pos], entry, child_shift, edit);
    }

    let Node::Branch { children, .. } = &**slot else {
        unreachable!("child index into a collision node");
    };
    let mut child = SharedPointer::clone(&children[pos]);
    let outcome = put_recursive(&mut child, entry, child_shift, edit);
    if outcome != PutOutcome::Unchanged {
        let Node::Branch { children, .. } = node::editable(slot, edit) else {
            unreachable!("branch copy changed variant");
        };
        children[pos] = child;
    }
    outcome
}

/// Replaces the inline entry at `bit` with the child `subtree`, turning the
/// `data_map` bit into a `node_map` bit.
fn migrate_to_node<K, V, P>(
    slot: &mut NodeRef<K, V, P>,
    bit: u32,
    subtree: NodeRef<K, V, P>,
    edit: Edit,
) where
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
    entries.remove(node::index(*data_map, bit));
    *data_map &= !bit;
    *node_map |= bit;
    children.insert(node::index(*node_map, bit), subtree);
}

/// Creates a subtree from two entries that share a position one level up.
///
/// Descends until the hash fragments differ, or creates a collision node
/// once every hash bit is consumed.
fn merge_two_entries<K, V, P>(
    e1: Entry<K, V>,
    e2: Entry<K, V>,
    shift: u32,
    edit: Edit,
) -> NodeRef<K, V, P>
where
    P: SharedPointerKind,
{
    if shift > node::MAX_SHIFT {
        debug_assert_eq!(e1.hash, e2.hash);
        return SharedPointer::new(Node::Collision {
            edit,
            hash: e1.hash,
            entries: vec![e1, e2],
        });
    }

    let f1 = node::fragment(e1.hash, shift);
    let f2 = node::fragment(e2.hash, shift);

    if f1 == f2 {
        let child = merge_two_entries(e1, e2, shift + node::BITS_PER_LEVEL, edit);
        SharedPointer::new(Node::Branch {
            edit,
            data_map: 0,
            node_map: node::mask(f1),
            entries: Vec::new(),
            children: vec![child],
        })
    } else {
        let entries = if f1 < f2 { vec![e1, e2] } else { vec![e2, e1] };
        SharedPointer::new(Node::Branch {
            edit,
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            entries,
            children: Vec::new(),
        })
    }
}
