//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: Balance snapshots, identifiers and the balance ceiling
//! - `transaction`: History records and driver commands
//! - `error`: Error types for the points engine

pub mod balance;
pub mod error;
pub mod transaction;

pub use balance::{current_millis, Balance, Point, Timestamp, UserId, MAX_BALANCE};
pub use error::PointError;
pub use transaction::{CommandKind, PointCommand, TransactionKind, TransactionRecord};
