//! Asynchronous CSV reader with batch interface
//!
//! Reads point commands in fixed-size batches from any
//! `futures::io::AsyncRead` source, for use inside a tokio runtime. Rows that
//! fail to parse never end a batch early; they are logged, counted and
//! skipped.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::PointCommand;
use csv_async::{AsyncDeserializer, AsyncReaderBuilder, Trim};
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Batched command reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    deserializer: AsyncDeserializer<R>,
    /// Data rows consumed so far, header excluded
    rows: u64,
    skipped: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Wrap `source`, which must start with a `type,user,amount` header
    pub fn new(source: R) -> Self {
        let deserializer = AsyncReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .create_deserializer(source);

        Self {
            deserializer,
            rows: 0,
            skipped: 0,
        }
    }

    /// Read up to `batch_size` valid commands
    ///
    /// An empty batch means the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<PointCommand> {
        let mut commands = Vec::with_capacity(batch_size);
        let mut stream = self.deserializer.deserialize::<CsvRecord>();

        while commands.len() < batch_size {
            let Some(row) = stream.next().await else {
                break;
            };
            self.rows += 1;
            // +1 for the header row
            let line = self.rows + 1;

            match row.map_err(|e| e.to_string()).and_then(convert_csv_record) {
                Ok(command) => commands.push(command),
                Err(e) => {
                    self.skipped += 1;
                    warn!(line, error = %e, "skipping invalid command");
                }
            }
        }

        commands
    }

    /// Number of data rows read so far
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Number of rows that were rejected before reaching the engine
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
