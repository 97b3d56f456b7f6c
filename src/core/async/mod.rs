//! Asynchronous implementations of core components
//!
//! This module provides the tokio-facing engine and the concurrent batch
//! executor used by the async processing strategy.
//!
//! # Architecture
//!
//! The async engine shares storage traits, lock registry and transition rules
//! with the blocking engine; only the per-user lock type differs:
//!
//! - **AsyncBalanceEngine**: per-user `tokio::sync::Mutex` locks, awaited
//! - **BatchProcessor**: runs a batch of commands as concurrent tasks
//!
//! # Thread Safety
//!
//! - Operations on different users proceed in parallel
//! - Operations on the same user are serialized by that user's lock
//! - No global locks

pub mod batch_processor;
pub mod engine;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::AsyncBalanceEngine;
