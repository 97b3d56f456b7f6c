//! Transaction-related types for the points engine
//!
//! This module defines the history record written for every accepted charge
//! or use, and the command record read from input files by the CLI driver.

use super::balance::{Point, Timestamp, UserId};
use std::fmt;

/// Kind of an accepted point mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Points were credited to the user
    Charge,

    /// Points were debited from the user
    Use,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Charge => f.write_str("CHARGE"),
            TransactionKind::Use => f.write_str("USE"),
        }
    }
}

/// Immutable history entry
///
/// Exactly one record is appended per accepted charge or use, inside the same
/// serialized section as the balance write it documents. `amount` is the
/// requested amount, not the resulting balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Log-wide cursor, strictly increasing in append order
    pub id: u64,

    /// The user whose balance changed
    pub user_id: UserId,

    /// Requested amount (always positive)
    pub amount: Point,

    /// Whether this was a charge or a use
    pub kind: TransactionKind,

    /// Time the mutation was applied, in milliseconds since the Unix epoch
    pub timestamp: Timestamp,
}

/// Commands understood by the CLI driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Register a user with an initial balance
    Enroll,

    /// Charge points to an existing user
    Charge,

    /// Use points of an existing user
    Use,
}

/// Input command as read from a CSV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCommand {
    /// What to do
    pub kind: CommandKind,

    /// Target user
    pub user_id: UserId,

    /// Initial balance for `Enroll`, requested amount otherwise
    pub amount: Point,
}
