//! Core traits for balance storage and history logging
//!
//! These are the storage collaborators the engines drive. Every method is
//! atomic on its own, but nothing here makes a sequence of calls atomic:
//! that guarantee belongs to the engines, which hold a per-user lock across
//! the whole read-validate-write-append sequence.

use crate::types::{Balance, Point, Timestamp, TransactionKind, TransactionRecord, UserId};

/// Authoritative balance per user
pub trait BalanceStore: Send + Sync {
    /// Read the balance of a user, or [`Balance::empty`] if it was never written
    fn get(&self, user_id: UserId) -> Balance;

    /// Replace the balance of a user
    fn put(&self, user_id: UserId, balance: Balance);

    /// Snapshot of every stored balance, in no particular order
    fn balances(&self) -> Vec<Balance>;
}

/// Append-only log of accepted mutations
pub trait HistoryLog: Send + Sync {
    /// Append a record and return it with its assigned id
    fn append(
        &self,
        user_id: UserId,
        amount: Point,
        kind: TransactionKind,
        timestamp: Timestamp,
    ) -> TransactionRecord;

    /// All records of a user in insertion order
    fn list_by_user(&self, user_id: UserId) -> Vec<TransactionRecord>;

    /// Total number of records across all users
    fn len(&self) -> usize;

    /// Whether no record was ever appended
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
