//! Balance mutation engine for tokio callers
//!
//! This module provides the `AsyncBalanceEngine`, the async counterpart of
//! [`crate::core::BalanceEngine`]. It has the same operations, errors and
//! invariants, but waits for a user's lock with `.await` instead of blocking
//! the worker thread.
//!
//! # Architecture
//!
//! ```text
//! AsyncBalanceEngine
//!     ├── Arc<S: BalanceStore>                       (authoritative balances)
//!     ├── Arc<H: HistoryLog>                         (append-only history)
//!     └── Arc<LockRegistry<tokio::sync::Mutex<()>>>  (one lock per user)
//! ```
//!
//! # Thread Safety
//!
//! The engine is cheap to clone; every clone shares the same storage and the
//! same lock registry, so clones can be moved into spawned tasks freely.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::core::balance_store::InMemoryBalanceStore;
use crate::core::history_log::InMemoryHistoryLog;
use crate::core::lock_registry::LockRegistry;
use crate::core::rules;
use crate::core::traits::{BalanceStore, HistoryLog};
use crate::types::{
    current_millis, Balance, Point, PointError, Timestamp, TransactionKind, TransactionRecord,
    UserId,
};

/// Async point balance engine
pub struct AsyncBalanceEngine<S = InMemoryBalanceStore, H = InMemoryHistoryLog> {
    /// Shared balance table
    store: Arc<S>,

    /// Shared history log
    history: Arc<H>,

    /// Shared per-user locks
    ///
    /// Every clone must see the same registry, otherwise two clones would
    /// hand out two different locks for one user.
    locks: Arc<LockRegistry<Mutex<()>>>,

    clock: fn() -> Timestamp,
}

impl AsyncBalanceEngine {
    /// Create an engine over fresh in-memory storage
    pub fn new() -> Self {
        Self::with_storage(
            Arc::new(InMemoryBalanceStore::new()),
            Arc::new(InMemoryHistoryLog::new()),
        )
    }
}

impl Default for AsyncBalanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, H> Clone for AsyncBalanceEngine<S, H> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            history: Arc::clone(&self.history),
            locks: Arc::clone(&self.locks),
            clock: self.clock,
        }
    }
}

impl<S, H> fmt::Debug for AsyncBalanceEngine<S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncBalanceEngine")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl<S: BalanceStore, H: HistoryLog> AsyncBalanceEngine<S, H> {
    /// Create an engine over the given storage collaborators
    pub fn with_storage(store: Arc<S>, history: Arc<H>) -> Self {
        Self {
            store,
            history,
            locks: Arc::new(LockRegistry::new()),
            clock: current_millis,
        }
    }

    /// Replace the wall clock used to stamp mutations
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Read the current balance of a user without locking
    pub fn get_balance(&self, user_id: UserId) -> Balance {
        self.store.get(user_id)
    }

    /// Charge `amount` points to the user of `snapshot`
    ///
    /// Same validation and errors as [`crate::core::BalanceEngine::charge`].
    pub async fn charge(&self, snapshot: &Balance, amount: Point) -> Result<Balance, PointError> {
        self.mutate(snapshot, amount, TransactionKind::Charge).await
    }

    /// Use `amount` points of the user of `snapshot`
    ///
    /// Same validation and errors as [`crate::core::BalanceEngine::use_points`].
    pub async fn use_points(
        &self,
        snapshot: &Balance,
        amount: Point,
    ) -> Result<Balance, PointError> {
        self.mutate(snapshot, amount, TransactionKind::Use).await
    }

    /// All charge and use records of a user, oldest first
    pub async fn get_history(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError> {
        if self.store.get(user_id).is_empty() {
            return Err(PointError::user_not_found(user_id));
        }

        let records = self.history.list_by_user(user_id);
        if records.is_empty() {
            return Err(PointError::history_empty(user_id));
        }

        Ok(records)
    }

    /// Register a user with an initial balance
    pub async fn enroll(&self, user_id: UserId, initial_point: Point) -> Result<Balance, PointError> {
        let lock = self.locks.acquire(user_id);
        let _guard = lock.lock().await;

        if self.store.get(user_id).exists() {
            return Err(PointError::user_already_exists(user_id));
        }

        let balance = Balance::new(user_id, initial_point, (self.clock)())?;
        self.store.put(user_id, balance);
        debug!(user_id, point = initial_point, "user enrolled");

        Ok(balance)
    }

    /// Every stored balance, sorted by user id
    pub fn balances(&self) -> Vec<Balance> {
        let mut balances = self.store.balances();
        balances.sort_by_key(|balance| balance.user_id());
        balances
    }

    /// Number of history records of a user
    pub fn history_count(&self, user_id: UserId) -> usize {
        self.history.list_by_user(user_id).len()
    }

    /// Number of users that own a lock
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    async fn mutate(
        &self,
        snapshot: &Balance,
        amount: Point,
        kind: TransactionKind,
    ) -> Result<Balance, PointError> {
        let user_id = snapshot.user_id();
        if snapshot.is_empty() {
            return Err(PointError::user_not_found(user_id));
        }

        let lock = self.locks.acquire(user_id);
        let _guard = lock.lock().await;

        let current = self.store.get(user_id);
        let updated = rules::apply(kind, &current, amount, (self.clock)()).map_err(|err| {
            debug!(user_id, amount, %kind, code = err.code(), "mutation rejected");
            err
        })?;

        self.store.put(user_id, updated);
        self.history.append(user_id, amount, kind, updated.updated_at());
        debug!(user_id, amount, %kind, point = updated.point(), "mutation applied");

        Ok(updated)
    }
}
