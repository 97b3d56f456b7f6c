//! Processing strategy module for command files
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! covering CSV parsing, engine execution and report output. This allows
//! different execution models (sequential, OS threads, tokio tasks) to be
//! selected at runtime.

use crate::cli::StrategyType;
use crate::io::BalanceSummary;
use crate::types::{Balance, PointCommand, PointError, UserId};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

pub mod r#async;
pub mod sync;
pub mod threaded;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;
pub use threaded::ThreadedProcessingStrategy;

/// Processing strategy trait for complete command-file pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from input file and write the balance report to output
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the file was processed, even if some commands were rejected
    /// * `Err(String)` if a fatal error occurred (unreadable input, failed output)
    ///
    /// Rejected commands and malformed rows are logged and skipped; they never
    /// cause this method to return an error.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is used by the threaded and async strategies; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    let config = config.unwrap_or_default();
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Threaded => Box::new(ThreadedProcessingStrategy::new(config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config)),
    }
}

/// Build report rows from the final balances
pub(crate) fn summarize<F>(balances: Vec<Balance>, history_count: F) -> Vec<BalanceSummary>
where
    F: Fn(UserId) -> usize,
{
    balances
        .into_iter()
        .map(|balance| BalanceSummary {
            user_id: balance.user_id(),
            point: balance.point(),
            history: history_count(balance.user_id()),
        })
        .collect()
}

/// Log the outcome of one command
pub(crate) fn log_outcome(command: &PointCommand, result: &Result<Balance, PointError>) {
    match result {
        Ok(balance) => debug!(
            user_id = command.user_id,
            kind = ?command.kind,
            amount = command.amount,
            point = balance.point(),
            "command accepted"
        ),
        Err(err) => warn!(
            user_id = command.user_id,
            kind = ?command.kind,
            amount = command.amount,
            code = err.code(),
            "command rejected: {}",
            err
        ),
    }
}
