//! Error types for the points engine
//!
//! This module defines every failure the engine can report.
//! Domain errors carry a stable code (see [`PointError::code`]) that transport
//! layers map to their own responses; the `Display` text is the human-readable
//! message.
//!
//! The CLI driver reports its own I/O and CSV failures as plain strings; they
//! never reach the engine.

use super::balance::{Point, UserId, MAX_BALANCE};
use thiserror::Error;

/// Main error type for the points engine
///
/// None of these are fatal to the process, and every failed engine operation
/// leaves balances and history untouched. Failures caused by a concurrent
/// operation landing first are reported through the same variants as any
/// other validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    /// The snapshot or user id does not belong to an enrolled user
    #[error("User {user_id} does not exist")]
    UserNotFound {
        /// The unknown user
        user_id: UserId,
    },

    /// Amount is zero or negative
    #[error("Amount must be at least 1 for user {user_id}, got {amount}")]
    InvalidAmount {
        /// Target user
        user_id: UserId,
        /// The rejected amount
        amount: Point,
    },

    /// Charge would push the balance above the ceiling
    #[error("Balance of user {user_id} cannot exceed {limit} points: current {current}, requested {requested}", limit = MAX_BALANCE)]
    MaxBalanceExceeded {
        /// Target user
        user_id: UserId,
        /// Balance at the time of the check
        current: Point,
        /// Requested charge
        requested: Point,
    },

    /// Use would push the balance below zero
    #[error("Not enough points for user {user_id}: current {current}, requested {requested}")]
    InsufficientBalance {
        /// Target user
        user_id: UserId,
        /// Balance at the time of the check
        current: Point,
        /// Requested use
        requested: Point,
    },

    /// History query on a user with no records
    #[error("User {user_id} has no charge or use history")]
    HistoryEmpty {
        /// Target user
        user_id: UserId,
    },

    /// Enrollment of a user that already exists
    #[error("User {user_id} already exists")]
    UserAlreadyExists {
        /// Target user
        user_id: UserId,
    },
}

impl PointError {
    /// Create a UserNotFound error
    pub fn user_not_found(user_id: UserId) -> Self {
        PointError::UserNotFound { user_id }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(user_id: UserId, amount: Point) -> Self {
        PointError::InvalidAmount { user_id, amount }
    }

    /// Create a MaxBalanceExceeded error
    pub fn max_balance_exceeded(user_id: UserId, current: Point, requested: Point) -> Self {
        PointError::MaxBalanceExceeded {
            user_id,
            current,
            requested,
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user_id: UserId, current: Point, requested: Point) -> Self {
        PointError::InsufficientBalance {
            user_id,
            current,
            requested,
        }
    }

    /// Create a HistoryEmpty error
    pub fn history_empty(user_id: UserId) -> Self {
        PointError::HistoryEmpty { user_id }
    }

    /// Create a UserAlreadyExists error
    pub fn user_already_exists(user_id: UserId) -> Self {
        PointError::UserAlreadyExists { user_id }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            PointError::UserNotFound { .. } => "USER_NOT_FOUND",
            PointError::InvalidAmount { .. } => "INVALID_AMOUNT",
            PointError::MaxBalanceExceeded { .. } => "MAX_POINT_LIMIT",
            PointError::InsufficientBalance { .. } => "NOT_ENOUGH_AMOUNT",
            PointError::HistoryEmpty { .. } => "POINT_HISTORY_EMPTY",
            PointError::UserAlreadyExists { .. } => "USER_ALREADY_EXISTS",
        }
    }

    /// HTTP status a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            PointError::UserNotFound { .. } => 404,
            PointError::UserAlreadyExists { .. } => 409,
            PointError::InvalidAmount { .. }
            | PointError::MaxBalanceExceeded { .. }
            | PointError::InsufficientBalance { .. }
            | PointError::HistoryEmpty { .. } => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::user_not_found(
        PointError::user_not_found(1),
        "User 1 does not exist"
    )]
    #[case::invalid_amount(
        PointError::invalid_amount(1, 0),
        "Amount must be at least 1 for user 1, got 0"
    )]
    #[case::max_balance_exceeded(
        PointError::max_balance_exceeded(1, 95_000, 10_000),
        "Balance of user 1 cannot exceed 100000 points: current 95000, requested 10000"
    )]
    #[case::insufficient_balance(
        PointError::insufficient_balance(1, 50, 100),
        "Not enough points for user 1: current 50, requested 100"
    )]
    #[case::history_empty(
        PointError::history_empty(1),
        "User 1 has no charge or use history"
    )]
    fn test_error_display(#[case] error: PointError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::user_not_found(PointError::user_not_found(1), "USER_NOT_FOUND", 404)]
    #[case::invalid_amount(PointError::invalid_amount(1, -5), "INVALID_AMOUNT", 400)]
    #[case::max_balance(PointError::max_balance_exceeded(1, 0, 1), "MAX_POINT_LIMIT", 400)]
    #[case::insufficient(PointError::insufficient_balance(1, 0, 1), "NOT_ENOUGH_AMOUNT", 400)]
    #[case::history_empty(PointError::history_empty(1), "POINT_HISTORY_EMPTY", 400)]
    #[case::already_exists(PointError::user_already_exists(1), "USER_ALREADY_EXISTS", 409)]
    fn test_code_and_status(
        #[case] error: PointError,
        #[case] code: &str,
        #[case] status: u16,
    ) {
        assert_eq!(error.code(), code);
        assert_eq!(error.status_code(), status);
    }
}
