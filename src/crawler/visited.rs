//! Visited-once bookkeeping

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of nodes already claimed by a traversal task
///
/// Keys are only ever inserted. Claiming is a single check-and-insert under the
/// lock, so of any number of tasks racing for the same node exactly one wins.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the calling task
    ///
    /// Returns `true` if this call inserted it, `false` if it was already present.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut visited = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if visited.contains(url) {
            return false;
        }
        visited.insert(url.to_string())
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    /// Number of claimed nodes
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the claimed nodes out of the set
    pub fn snapshot(&self) -> HashSet<String> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
