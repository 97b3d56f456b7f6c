//! Thread-safe in-memory history log
//!
//! This module provides the `InMemoryHistoryLog` struct, the default
//! [`HistoryLog`] used by both engines.
//!
//! # Design
//!
//! Records are grouped per user in a `DashMap<UserId, Vec<TransactionRecord>>`
//! so that a full scan for one user never walks other users' entries. Each
//! append takes the shard lock of its user for the duration of the push, so
//! a concurrent `list_by_user` sees either the log before or after the
//! append, never a torn vector. Record ids come from a log-wide atomic
//! cursor.

use crate::core::traits::HistoryLog;
use crate::types::{Point, Timestamp, TransactionKind, TransactionRecord, UserId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory append-only history
#[derive(Debug)]
pub struct InMemoryHistoryLog {
    /// Records per user, in append order
    records: DashMap<UserId, Vec<TransactionRecord>>,

    /// Next record id
    cursor: AtomicU64,
}

impl InMemoryHistoryLog {
    /// Create an empty log; the first record gets id 1
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            cursor: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog for InMemoryHistoryLog {
    fn append(
        &self,
        user_id: UserId,
        amount: Point,
        kind: TransactionKind,
        timestamp: Timestamp,
    ) -> TransactionRecord {
        let mut entry = self.records.entry(user_id).or_default();

        // Taken under the shard lock so ids within one user follow push order
        let record = TransactionRecord {
            id: self.cursor.fetch_add(1, Ordering::Relaxed),
            user_id,
            amount,
            kind,
            timestamp,
        };
        entry.value_mut().push(record.clone());

        record
    }

    fn list_by_user(&self, user_id: UserId) -> Vec<TransactionRecord> {
        self.records
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }
}
