//! Balance transition rules
//!
//! Pure functions that validate a charge or use against a balance snapshot
//! and compute the resulting balance. They perform no I/O and touch no
//! shared state; the engines call them while holding the user's lock.
//!
//! Validation order is fixed for both operations: amount positivity first,
//! then the ceiling (charge) or floor (use) check.
//!
//! The timestamp of the new balance is `max(now, current.updated_at())`,
//! so timestamps never go backwards for a user even if the wall clock does.

use crate::types::{Balance, Point, PointError, Timestamp, TransactionKind, MAX_BALANCE};

/// Apply a charge or use depending on `kind`
pub fn apply(
    kind: TransactionKind,
    current: &Balance,
    amount: Point,
    now: Timestamp,
) -> Result<Balance, PointError> {
    match kind {
        TransactionKind::Charge => apply_charge(current, amount, now),
        TransactionKind::Use => apply_use(current, amount, now),
    }
}

/// Credit `amount` points to `current`
///
/// # Errors
///
/// - `UserNotFound` if `current` is the sentinel balance
/// - `InvalidAmount` if `amount <= 0`
/// - `MaxBalanceExceeded` if the result would exceed [`MAX_BALANCE`]
pub fn apply_charge(current: &Balance, amount: Point, now: Timestamp) -> Result<Balance, PointError> {
    let user_id = current.user_id();
    if current.is_empty() {
        return Err(PointError::user_not_found(user_id));
    }

    if amount <= 0 {
        return Err(PointError::invalid_amount(user_id, amount));
    }

    let new_point = current
        .point()
        .checked_add(amount)
        .filter(|point| *point <= MAX_BALANCE)
        .ok_or_else(|| PointError::max_balance_exceeded(user_id, current.point(), amount))?;

    Balance::new(user_id, new_point, now.max(current.updated_at()))
}

/// Debit `amount` points from `current`
///
/// # Errors
///
/// - `UserNotFound` if `current` is the sentinel balance
/// - `InvalidAmount` if `amount <= 0`
/// - `InsufficientBalance` if the result would be negative
pub fn apply_use(current: &Balance, amount: Point, now: Timestamp) -> Result<Balance, PointError> {
    let user_id = current.user_id();
    if current.is_empty() {
        return Err(PointError::user_not_found(user_id));
    }

    if amount <= 0 {
        return Err(PointError::invalid_amount(user_id, amount));
    }

    if current.point() < amount {
        return Err(PointError::insufficient_balance(
            user_id,
            current.point(),
            amount,
        ));
    }

    Balance::new(user_id, current.point() - amount, now.max(current.updated_at()))
}
