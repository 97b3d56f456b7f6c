//! Balance-related types for the points engine
//!
//! This module defines the immutable `Balance` snapshot and the identifier
//! and unit aliases shared across the crate.

use super::error::PointError;
use std::time::{SystemTime, UNIX_EPOCH};

/// User identifier
pub type UserId = u64;

/// Point amount
///
/// Signed so that callers can submit zero or negative amounts and receive an
/// `InvalidAmount` error instead of a type-level rejection.
pub type Point = i64;

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Maximum number of points a single user may hold
pub const MAX_BALANCE: Point = 100_000;

/// Current wall-clock time in milliseconds
///
/// A clock set before the Unix epoch reads as 0.
pub fn current_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as Timestamp)
        .unwrap_or_default()
}

/// Point balance snapshot for a single user
///
/// Balances are immutable values: every charge or use produces a new
/// `Balance` rather than mutating an existing one. A snapshot handed out by
/// the engine may already be stale by the time the caller acts on it; the
/// engine re-reads the authoritative value under the user's lock.
///
/// A balance read for a user that was never enrolled returns the sentinel
/// produced by [`Balance::empty`], whose `exists()` is `false`. Existence is
/// an explicit flag, so an enrolled user holding 0 points is still a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    user_id: UserId,
    point: Point,
    updated_at: Timestamp,
    exists: bool,
}

impl Balance {
    /// Sentinel balance for a user the store has never seen
    pub fn empty(user_id: UserId) -> Self {
        Balance {
            user_id,
            point: 0,
            updated_at: 0,
            exists: false,
        }
    }

    /// Create the balance of an existing user
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `point` is negative
    /// - `MaxBalanceExceeded` if `point` is above [`MAX_BALANCE`]
    pub fn new(user_id: UserId, point: Point, updated_at: Timestamp) -> Result<Self, PointError> {
        if point < 0 {
            return Err(PointError::invalid_amount(user_id, point));
        }
        if point > MAX_BALANCE {
            return Err(PointError::max_balance_exceeded(user_id, 0, point));
        }

        Ok(Balance {
            user_id,
            point,
            updated_at,
            exists: true,
        })
    }

    /// The owning user
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Points currently held
    pub fn point(&self) -> Point {
        self.point
    }

    /// Time of the last accepted mutation (0 for the sentinel)
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Whether this balance belongs to an enrolled user
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Whether this is the "user not found" sentinel
    pub fn is_empty(&self) -> bool {
        !self.exists
    }
}
