//! Multi-threaded processing strategy
//!
//! Runs the command file through one shared [`BalanceEngine`] from several OS
//! threads at once, the way a thread-per-request server would.
//!
//! # Design
//!
//! 1. Every command is read up front with `SyncReader`.
//! 2. `enroll` commands are applied first, in file order.
//! 3. The remaining commands are dealt round-robin to `max_concurrent`
//!    scoped threads. Each thread executes its share in order; threads race
//!    each other for the per-user locks.
//!
//! Commands for one user can land on different threads, so their relative
//! order is not preserved. The final report is deterministic whenever no
//! command's acceptance depends on that order.

use crate::core::BalanceEngine;
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::sync::execute_command;
use crate::strategy::{log_outcome, summarize, BatchConfig, ProcessingStrategy};
use crate::types::{CommandKind, PointCommand};
use std::io::Write;
use std::path::Path;
use std::thread;
use tracing::warn;

/// Thread-pool processing strategy
#[derive(Debug, Clone)]
pub struct ThreadedProcessingStrategy {
    config: BatchConfig,
}

impl ThreadedProcessingStrategy {
    /// Create a new ThreadedProcessingStrategy
    ///
    /// Only `config.max_concurrent` is used, as the number of worker threads.
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for ThreadedProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let engine = BalanceEngine::new();
        let reader = SyncReader::new(input_path)?;

        let commands: Vec<PointCommand> = reader
            .filter_map(|result| {
                result
                    .map_err(|e| warn!(error = %e, "skipping invalid command"))
                    .ok()
            })
            .collect();

        let (enrollments, mutations): (Vec<_>, Vec<_>) = commands
            .into_iter()
            .partition(|command| command.kind == CommandKind::Enroll);

        for command in &enrollments {
            log_outcome(command, &execute_command(&engine, command));
        }

        let workers = self.config.max_concurrent.min(mutations.len()).max(1);
        let mut shares: Vec<Vec<PointCommand>> = vec![Vec::new(); workers];
        for (i, command) in mutations.into_iter().enumerate() {
            shares[i % workers].push(command);
        }

        thread::scope(|scope| {
            for share in &shares {
                let engine = &engine;
                scope.spawn(move || {
                    for command in share {
                        log_outcome(command, &execute_command(engine, command));
                    }
                });
            }
        });

        let summaries = summarize(engine.balances(), |user_id| engine.history_count(user_id));
        write_balances_csv(&summaries, output)
    }
}
