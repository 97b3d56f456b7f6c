//! Synchronous processing strategy
//!
//! Single-threaded implementation of the ProcessingStrategy trait. Commands
//! are executed one at a time in file order, so the report is fully
//! deterministic for a given input.
//!
//! # Design
//!
//! The SyncProcessingStrategy only orchestrates, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Balance mutations to `BalanceEngine`
//! - CSV output to `csv_format::write_balances_csv`

use crate::core::BalanceEngine;
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{log_outcome, summarize, ProcessingStrategy};
use crate::types::{Balance, CommandKind, PointCommand, PointError};
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Run one command against a blocking engine, as a request handler would
///
/// Charges and uses first read a snapshot and then hand it to the engine.
pub fn execute_command(
    engine: &BalanceEngine,
    command: &PointCommand,
) -> Result<Balance, PointError> {
    match command.kind {
        CommandKind::Enroll => engine.enroll(command.user_id, command.amount),
        CommandKind::Charge => {
            let snapshot = engine.get_balance(command.user_id);
            engine.charge(&snapshot, command.amount)
        }
        CommandKind::Use => {
            let snapshot = engine.get_balance(command.user_id);
            engine.use_points(&snapshot, command.amount)
        }
    }
}

/// Synchronous processing strategy
///
/// ```no_run
/// use rust_points_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let engine = BalanceEngine::new();
        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(command) => {
                    let outcome = execute_command(&engine, &command);
                    log_outcome(&command, &outcome);
                }
                Err(e) => warn!(error = %e, "skipping invalid command"),
            }
        }

        let summaries = summarize(engine.balances(), |user_id| engine.history_count(user_id));
        write_balances_csv(&summaries, output)
    }
}
