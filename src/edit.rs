//! Transient session tokens.
//!
//! Every node carries the [`Edit`] of the operation (or batch) that
//! allocated it. A later operation may mutate a node in place only when it
//! presents the same token *and* holds the only pointer to that node.

use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_EDIT: AtomicU64 = AtomicU64::new(1);

/// Opaque session token.
///
/// Tokens are compared by identity only: two calls to [`Edit::new`] never
/// return equal tokens. A token records a relation to the session that
/// created a node; it never keeps anything alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edit(NonZeroU64);

impl Edit {
    /// Starts a new session.
    ///
    /// # Panics
    ///
    /// Panics if the process exhausts the 64-bit token space.
    #[must_use]
    pub fn new() -> Self {
        let id = NEXT_EDIT.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).expect("edit token space exhausted"))
    }

    /// Returns `true` if a node tagged with `owner` may be edited in place
    /// under this session.
    #[inline]
    #[must_use]
    pub fn owns(self, owner: Self) -> bool {
        self == owner
    }
}

impl Default for Edit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edit#{}", self.0)
    }
}
