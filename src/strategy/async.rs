//! Asynchronous batch processing strategy
//!
//! Tokio-based implementation of the ProcessingStrategy trait. Commands are
//! read in batches and each batch is executed as a burst of concurrent tasks
//! against a shared [`AsyncBalanceEngine`].
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (enrollments first, then concurrent tasks)
//!     └── AsyncBalanceEngine (per-user tokio locks)
//! ```
//!
//! Batches run one after another: every command of a batch completes before
//! the next batch is read. Within a batch, commands for the same user race
//! for that user's lock.

use crate::core::r#async::{AsyncBalanceEngine, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_balances_csv;
use crate::strategy::{log_outcome, summarize, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for batch processing
///
/// `max_concurrent` bounds the tasks in flight for the async strategy and is
/// the worker thread count for both the threaded and async strategies.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Maximum number of commands executing concurrently
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(
                max_concurrent,
                default = default.max_concurrent,
                "invalid max_concurrent, using default"
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        // Fields are public, so a hand-built config may still hold zeros
        let batch_size = self.config.batch_size.max(1);
        let max_concurrent = self.config.max_concurrent.max(1);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(max_concurrent)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let engine = AsyncBalanceEngine::new();
            let processor = BatchProcessor::new(engine.clone(), max_concurrent);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads futures::io, tokio files implement tokio::io
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for processed in processor.process_batch(batch).await {
                    log_outcome(&processed.command, &processed.result);
                }
            }

            info!(
                rows = reader.rows(),
                skipped = reader.skipped(),
                locks = engine.lock_count(),
                "input consumed"
            );

            let summaries = summarize(engine.balances(), |user_id| engine.history_count(user_id));
            write_balances_csv(&summaries, output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(content: &str, config: BatchConfig) -> String {
        let file = create_temp_csv(content);
        let strategy = AsyncProcessingStrategy::new(config);
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);

        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent, num_cpus::get());
    }

    #[test]
    fn test_async_strategy_processes_commands() {
        let output = run(
            "type,user,amount\nenroll,1,1000\ncharge,1,500\nenroll,2,10\nuse,2,10\n",
            BatchConfig::default(),
        );

        assert_eq!(output, "user,point,history\n1,1500,1\n2,0,1\n");
    }

    #[test]
    fn test_async_strategy_floor_under_contention() {
        let mut content = String::from("type,user,amount\nenroll,1,1000\n");
        for _ in 0..15 {
            content.push_str("use,1,100\n");
        }

        let output = run(&content, BatchConfig::new(100, 8));

        assert_eq!(output, "user,point,history\n1,0,10\n");
    }

    #[test]
    fn test_async_strategy_batches_run_in_sequence() {
        // With batch size 2 the enrollment of user 2 lands in the second
        // batch, after user 2's charge has already been rejected.
        let output = run(
            "type,user,amount\nenroll,1,0\ncharge,2,10\nenroll,2,5\ncharge,1,7\n",
            BatchConfig::new(2, 2),
        );

        assert_eq!(output, "user,point,history\n1,7,1\n2,5,0\n");
    }

    #[test]
    fn test_async_strategy_clamps_hand_built_zero_config() {
        let content = "type,user,amount\nenroll,1,100\ncharge,1,5\n";

        let zero_batch = run(
            content,
            BatchConfig {
                batch_size: 0,
                max_concurrent: 2,
            },
        );
        let zero_workers = run(
            content,
            BatchConfig {
                batch_size: 10,
                max_concurrent: 0,
            },
        );

        assert_eq!(zero_batch, "user,point,history\n1,105,1\n");
        assert_eq!(zero_workers, "user,point,history\n1,105,1\n");
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);

        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}
