//! Rust Points Engine Library
//! # Overview
//!
//! This library keeps a point balance per user and applies charge and use
//! requests to it safely under concurrency. Requests for the same user are
//! serialized; requests for different users proceed in parallel.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Balance, TransactionRecord, PointError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::rules`] - Pure charge/use transitions with validation
//!   - [`core::lock_registry`] - One lock per user, created on first use
//!   - [`core::engine`] - Blocking engine built on the two above
//!   - [`core::r#async`] - Tokio engine and concurrent batch execution
//! - [`io`] - CSV command parsing and balance report output
//! - [`strategy`] - Sync, threaded and async processing pipelines
//! - [`logging`] - tracing subscriber setup
//!
//! # Operations
//!
//! - **Charge**: add points, rejected if the balance would exceed 100,000
//! - **Use**: remove points, rejected if the balance would drop below zero
//! - **History**: list a user's accepted charges and uses in order
//!
//! Every accepted mutation stores the new balance and appends exactly one
//! history record while the user's lock is held.

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    AsyncBalanceEngine, BalanceEngine, BalanceStore, HistoryLog, InMemoryBalanceStore,
    InMemoryHistoryLog, LockRegistry,
};
pub use io::write_balances_csv;
pub use types::{
    Balance, Point, PointError, Timestamp, TransactionKind, TransactionRecord, UserId,
    MAX_BALANCE,
};
