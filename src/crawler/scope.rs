//! Completion detection for a tree of traversal tasks
//!
//! A [`TaskScope`] counts live tasks. Each task holds a [`TaskGuard`] obtained
//! from [`TaskScope::enter`] before the task is spawned; dropping the guard is
//! the task's exit. A parent enters its children's guards while its own guard
//! is still alive, so the count cannot touch zero while any child is pending.

use std::sync::Arc;
use tokio::sync::watch;

/// Live-task counter shared by every task of one crawl
#[derive(Debug, Clone)]
pub struct TaskScope {
    live: Arc<watch::Sender<usize>>,
}

impl TaskScope {
    /// Creates a scope with no live tasks
    pub fn new() -> Self {
        let (live, _) = watch::channel(0);
        Self {
            live: Arc::new(live),
        }
    }

    /// Registers one more live task
    ///
    /// Must be called before the task is spawned.
    pub fn enter(&self) -> TaskGuard {
        self.live.send_modify(|n| *n += 1);
        TaskGuard {
            scope: self.clone(),
        }
    }

    /// Number of tasks that have entered and not yet exited
    pub fn live_tasks(&self) -> usize {
        *self.live.borrow()
    }

    /// Waits until the live-task count is zero
    pub async fn wait_idle(&self) {
        let mut rx = self.live.subscribe();
        // The sender is owned by `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    fn exit(&self) {
        self.live.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Membership of one task in a [`TaskScope`]; dropping it exits the task
#[derive(Debug)]
#[must_use = "dropping the guard immediately exits the task"]
pub struct TaskGuard {
    scope: TaskScope,
}

impl TaskGuard {
    /// Registers a child task in the same scope as this one
    pub fn child(&self) -> TaskGuard {
        self.scope.enter()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.scope.exit();
    }
}
