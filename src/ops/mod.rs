//! Trie algorithms, operating on `Option<NodeRef>` roots.

pub mod get;
pub mod insert;
pub mod reduce;
pub mod remove;

use archery::{SharedPointer, SharedPointerKind};

use crate::edit::Edit;
use crate::hash::HashCode;
use crate::node::{Entry, Node, NodeRef};

use self::insert::{PutOutcome, put_recursive};
use self::remove::remove_recursive;

/// Puts `entry` under `root`, creating the root for an empty trie.
pub fn put_root<K, V, P>(
    root: &mut Option<NodeRef<K, V, P>>,
    entry: Entry<K, V>,
    edit: Edit,
) -> PutOutcome
where
    K: Eq + Clone,
    V: PartialEq + Clone,
    P: SharedPointerKind,
{
    match root {
        Some(node) => put_recursive(node, entry, 0, edit),
        None => {
            *root = Some(SharedPointer::new(Node::singleton(edit, entry, 0)));
            PutOutcome::Inserted
        }
    }
}

/// Removes `key` from `root`. An emptied root collapses to `None`.
pub fn remove_root<K, V, P>(
    root: &mut Option<NodeRef<K, V, P>>,
    hash: HashCode,
    key: &K,
    edit: Edit,
) -> bool
where
    K: Eq + Clone,
    V: Clone,
    P: SharedPointerKind,
{
    let Some(node) = root else {
        return false;
    };
    if !remove_recursive(node, hash, key, 0, edit) {
        return false;
    }
    if node.is_empty() {
        *root = None;
    }
    true
}
