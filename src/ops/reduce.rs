//! Depth-first fold over every key-value pair of a subtree.

use archery::SharedPointerKind;

use crate::node::Node;

/// Folds `f` over the subtree rooted at `node`.
///
/// Visits a branch's inline entries first, then its children, each in bit
/// order. The order follows hash fragments, not insertion or key order.
pub fn fold_recursive<K, V, P, T, F>(node: &Node<K, V, P>, seed: T, f: &mut F) -> T
where
    P: SharedPointerKind,
    F: FnMut(T, &K, &V) -> T,
{
    match node {
        Node::Branch {
            entries, children, ..
        } => {
            let acc = entries
                .iter()
                .fold(seed, |acc, e| f(acc, &e.key, &e.value));
            children
                .iter()
                .fold(acc, |acc, child| fold_recursive(&**child, acc, f))
        }
        Node::Collision { entries, .. } => entries
            .iter()
            .fold(seed, |acc, e| f(acc, &e.key, &e.value)),
    }
}
