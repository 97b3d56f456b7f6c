//! Balance mutation engine
//!
//! This module provides the `BalanceEngine`, the component callers invoke to
//! read balances, charge or use points, and query history. It coordinates the
//! `BalanceStore`, the `HistoryLog` and the per-user `LockRegistry`.
//!
//! The engine enforces:
//! - Existence of the user before any mutation
//! - Per-user serialization of every read-validate-write-append sequence
//! - The balance invariants through the pure functions in [`crate::core::rules`]
//! - One history record per accepted mutation, written under the same lock
//!
//! # Thread Safety
//!
//! All methods take `&self`; share the engine across threads with an `Arc`.
//! Waiting for a user's lock blocks the calling thread. Operations on
//! different users never wait on each other.

use std::sync::{Arc, Mutex, PoisonError};

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

/// Blocking point balance engine
#[derive(Debug)]
pub struct BalanceEngine<S = InMemoryBalanceStore, H = InMemoryHistoryLog> {
    store: Arc<S>,
    history: Arc<H>,
    locks: LockRegistry<Mutex<()>>,
    clock: fn() -> Timestamp,
}

impl BalanceEngine {
    /// Create an engine over fresh in-memory storage
    pub fn new() -> Self {
        Self::with_storage(
            Arc::new(InMemoryBalanceStore::new()),
            Arc::new(InMemoryHistoryLog::new()),
        )
    }
}

impl Default for BalanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BalanceStore, H: HistoryLog> BalanceEngine<S, H> {
    /// Create an engine over the given storage collaborators
    pub fn with_storage(store: Arc<S>, history: Arc<H>) -> Self {
        Self {
            store,
            history,
            locks: LockRegistry::new(),
            clock: current_millis,
        }
    }

    /// Replace the wall clock used to stamp mutations
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Read the current balance of a user
    ///
    /// Takes no lock, so the value may be stale as soon as it is returned.
    /// Unknown users yield [`Balance::empty`]; this call never fails.
    pub fn get_balance(&self, user_id: UserId) -> Balance {
        self.store.get(user_id)
    }

    /// Charge `amount` points to the user of `snapshot`
    ///
    /// The snapshot only identifies the user; the authoritative balance is
    /// re-read under the user's lock before validation.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if `snapshot` is the sentinel balance
    /// - `InvalidAmount` if `amount <= 0`
    /// - `MaxBalanceExceeded` if the charge would exceed the ceiling
    pub fn charge(&self, snapshot: &Balance, amount: Point) -> Result<Balance, PointError> {
        self.mutate(snapshot, amount, TransactionKind::Charge)
    }

    /// Use `amount` points of the user of `snapshot`
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if `snapshot` is the sentinel balance
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientBalance` if the balance would drop below zero
    pub fn use_points(&self, snapshot: &Balance, amount: Point) -> Result<Balance, PointError> {
        self.mutate(snapshot, amount, TransactionKind::Use)
    }

    /// All charge and use records of a user, oldest first
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user was never enrolled
    /// - `HistoryEmpty` if the user has no records
    pub fn get_history(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError> {
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
    ///
    /// No history record is written for enrollment.
    ///
    /// # Errors
    ///
    /// - `UserAlreadyExists` if the user already has a balance
    /// - `InvalidAmount` if `initial_point` is negative
    /// - `MaxBalanceExceeded` if `initial_point` is above the ceiling
    pub fn enroll(&self, user_id: UserId, initial_point: Point) -> Result<Balance, PointError> {
        let lock = self.locks.acquire(user_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

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

    fn mutate(
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
        // The mutex guards no data; a panic elsewhere cannot leave a torn value
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

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
