//! Core business logic module
//!
//! This module contains the balance mutation components:
//! - `traits` - Storage collaborator abstractions
//! - `balance_store` - In-memory authoritative balances
//! - `history_log` - In-memory append-only history
//! - `lock_registry` - One lock per user, created on first use
//! - `rules` - Pure charge/use transition functions
//! - `engine` - Blocking orchestration under per-user locks
//! - `async` - Tokio orchestration and concurrent batch execution

pub mod balance_store;
pub mod r#async;
pub mod engine;
pub mod history_log;
pub mod lock_registry;
pub mod rules;
pub mod traits;

pub use balance_store::InMemoryBalanceStore;
pub use engine::BalanceEngine;
pub use history_log::InMemoryHistoryLog;
pub use lock_registry::LockRegistry;
pub use r#async::{AsyncBalanceEngine, BatchProcessor, ProcessingResult};
pub use traits::{BalanceStore, HistoryLog};
