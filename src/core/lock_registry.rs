//! Per-user lock registry
//!
//! Hands out exactly one serialization primitive per user id. The lock for a
//! user is created the first time anyone asks for it and is then reused for
//! the rest of the process lifetime.
//!
//! # Design
//!
//! Locks are stored as `Arc<L>` in a `DashMap`. `acquire` goes through the
//! entry API, which holds the shard's write lock while checking for and
//! inserting the handle, so two threads racing on the same unseen user both
//! leave with the same `Arc`. Callers clone the `Arc` out and release the
//! shard before locking the handle itself; waiting on a busy user therefore
//! never blocks lookups for other users.
//!
//! Entries are never removed. Memory grows with the number of distinct users
//! seen, which is acceptable for a bounded user population.

use crate::types::UserId;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of per-user locks
///
/// Generic over the lock type so that the blocking engine can use
/// `std::sync::Mutex<()>` and the async engine `tokio::sync::Mutex<()>`.
pub struct LockRegistry<L> {
    locks: DashMap<UserId, Arc<L>>,
}

impl<L: Default> LockRegistry<L> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock of a user, creating it on first use
    pub fn acquire(&self, user_id: UserId) -> Arc<L> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(L::default()))
            .value()
            .clone()
    }
}

impl<L> LockRegistry<L> {
    /// Number of users that currently own a lock
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no lock has been handed out yet
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<L: Default> Default for LockRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> fmt::Debug for LockRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockRegistry")
            .field("users", &self.locks.len())
            .finish()
    }
}
