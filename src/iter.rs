//! Iterator types for CHAMP maps.

use std::iter::FusedIterator;
use std::slice;

use archery::SharedPointerKind;

use crate::node::{Entry, Node, NodeRef};

/// Lazy depth-first iterator over `(&K, &V)` pairs of a
/// [`GenericChampMap`](crate::GenericChampMap).
///
/// Yields in the same order as [`fold_with_key`](crate::GenericChampMap::fold_with_key).
/// Each call to `iter()` starts a fresh traversal; iterators share no cursor.
pub struct Iter<'a, K, V, P: SharedPointerKind> {
    stack: Vec<Frame<'a, K, V, P>>,
    remaining: usize,
}

/// Unvisited part of one node on the traversal path.
struct Frame<'a, K, V, P: SharedPointerKind> {
    entries: slice::Iter<'a, Entry<K, V>>,
    children: slice::Iter<'a, NodeRef<K, V, P>>,
}

impl<'a, K, V, P: SharedPointerKind> Frame<'a, K, V, P> {
    fn new(node: &'a Node<K, V, P>) -> Self {
        match node {
            Node::Branch {
                entries, children, ..
            } => Self {
                entries: entries.iter(),
                children: children.iter(),
            },
            Node::Collision { entries, .. } => Self {
                entries: entries.iter(),
                children: slice::Iter::default(),
            },
        }
    }
}

impl<'a, K, V, P: SharedPointerKind> Iter<'a, K, V, P> {
    /// Creates an iterator over the subtree at `root` holding `len` entries.
    ///
    /// Stack depth is bounded by the trie depth, not by `len`.
    pub(crate) fn new(root: Option<&'a Node<K, V, P>>, len: usize) -> Self {
        let mut stack = Vec::with_capacity(8);
        if let Some(node) = root {
            stack.push(Frame::new(node));
        }
        Self {
            stack,
            remaining: len,
        }
    }
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Iter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some(e) = frame.entries.next() {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            if let Some(child) = frame.children.next() {
                self.stack.push(Frame::new(&**child));
            } else {
                self.stack.pop();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, P: SharedPointerKind> ExactSizeIterator for Iter<'_, K, V, P> {}

impl<K, V, P: SharedPointerKind> FusedIterator for Iter<'_, K, V, P> {}

impl<K, V, P: SharedPointerKind> Clone for Iter<'_, K, V, P> {
    fn clone(&self) -> Self {
        Self {
            stack: self
                .stack
                .iter()
                .map(|frame| Frame {
                    entries: frame.entries.clone(),
                    children: frame.children.clone(),
                })
                .collect(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over the keys of a [`GenericChampMap`](crate::GenericChampMap).
pub struct Keys<'a, K, V, P: SharedPointerKind> {
    pub(crate) inner: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Keys<'a, K, V, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: SharedPointerKind> ExactSizeIterator for Keys<'_, K, V, P> {}

impl<K, V, P: SharedPointerKind> FusedIterator for Keys<'_, K, V, P> {}

/// Iterator over the values of a [`GenericChampMap`](crate::GenericChampMap).
pub struct Values<'a, K, V, P: SharedPointerKind> {
    pub(crate) inner: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Values<'a, K, V, P> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: SharedPointerKind> ExactSizeIterator for Values<'_, K, V, P> {}

impl<K, V, P: SharedPointerKind> FusedIterator for Values<'_, K, V, P> {}
