//! Concurrent batch execution of point commands
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! commands against an [`AsyncBalanceEngine`] the way a pool of request
//! handlers would: every charge and use of the batch runs as its own tokio
//! task, all at once, contending for the same per-user locks.
//!
//! # Design
//!
//! A batch is split in two phases:
//! 1. `enroll` commands run first, one after another in input order, so that
//!    the users they create exist before anyone charges them.
//! 2. The remaining commands are spawned as tasks, at most
//!    `max_concurrent` in flight. Each task reads a snapshot and then calls
//!    `charge` or `use_points` with it, exactly like an external caller.
//!
//! Commands for the same user in phase 2 have no ordering guarantee relative
//! to each other; only the engine's invariants hold.

use futures::stream::{self, StreamExt};
use tracing::error;

use super::AsyncBalanceEngine;
use crate::types::{Balance, CommandKind, PointCommand, PointError};

/// Result of executing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was executed
    pub command: PointCommand,

    /// The resulting balance or the rejection
    pub result: Result<Balance, PointError>,
}

/// Concurrent command executor
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Engine shared by every spawned task
    engine: AsyncBalanceEngine,

    /// Upper bound on tasks in flight
    max_concurrent: usize,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// A `max_concurrent` of 0 is treated as 1.
    pub fn new(engine: AsyncBalanceEngine, max_concurrent: usize) -> Self {
        Self {
            engine,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Split a batch into enrollments and mutations, keeping input order in each
    pub fn split_enrollments(
        &self,
        batch: Vec<PointCommand>,
    ) -> (Vec<PointCommand>, Vec<PointCommand>) {
        batch
            .into_iter()
            .partition(|command| command.kind == CommandKind::Enroll)
    }

    /// Execute one command against the engine
    pub async fn execute(&self, command: PointCommand) -> ProcessingResult {
        let result = match command.kind {
            CommandKind::Enroll => self.engine.enroll(command.user_id, command.amount).await,
            CommandKind::Charge => {
                let snapshot = self.engine.get_balance(command.user_id);
                self.engine.charge(&snapshot, command.amount).await
            }
            CommandKind::Use => {
                let snapshot = self.engine.get_balance(command.user_id);
                self.engine.use_points(&snapshot, command.amount).await
            }
        };

        ProcessingResult { command, result }
    }

    /// Execute a batch: enrollments in order, then everything else concurrently
    ///
    /// Results of the concurrent phase come back in completion order. A task
    /// that panics is logged and its result dropped.
    pub async fn process_batch(&self, batch: Vec<PointCommand>) -> Vec<ProcessingResult> {
        let (enrollments, mutations) = self.split_enrollments(batch);

        let mut results = Vec::with_capacity(enrollments.len() + mutations.len());
        for command in enrollments {
            results.push(self.execute(command).await);
        }

        let mut in_flight = stream::iter(mutations)
            .map(|command| {
                let processor = self.clone();
                tokio::spawn(async move { processor.execute(command).await })
            })
            .buffer_unordered(self.max_concurrent);

        while let Some(joined) = in_flight.next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => error!(error = %e, "command task panicked"),
            }
        }

        results
    }
}
