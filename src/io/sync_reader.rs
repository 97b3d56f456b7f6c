//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over point commands from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<PointCommand, String>` for each CSV row:
//!
//! ```no_run
//! use rust_points_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Processing command: {:?}", command),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Individual record errors are yielded as Err variants, with line numbers

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::PointCommand;
use csv::{DeserializeRecordsIntoIter, ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one record at a time; memory use does not grow with file size.
pub struct SyncReader {
    records: DeserializeRecordsIntoIter<File, CsvRecord>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader trims whitespace from all fields and tolerates rows
    /// with a missing trailing amount column.
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let records = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file)
            .into_deserialize();

        Ok(Self {
            records,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<PointCommand, String>;

    /// Get the next command from the CSV file
    ///
    /// Line numbers in errors count the header as line 1.
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.records.next()?;
        self.line_num += 1;

        match next {
            Ok(csv_record) => Some(
                convert_csv_record(csv_record)
                    .map_err(|e| format!("Line {}: {}", self.line_num, e)),
            ),
            Err(e) => Some(Err(format!(
                "Line {}: CSV parse error: {}",
                self.line_num, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandKind;
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

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(result.is_err());
        assert!(result.err().unwrap().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_iterates_commands() {
        let csv_content = "type,user,amount\nenroll,1,1000\ncharge,1,500\nuse,1,200\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let commands: Vec<_> = reader.filter_map(Result::ok).collect();

        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].kind, CommandKind::Enroll);
        assert_eq!(commands[0].amount, 1_000);
        assert_eq!(commands[1].kind, CommandKind::Charge);
        assert_eq!(commands[2].kind, CommandKind::Use);
        assert!(commands.iter().all(|c| c.user_id == 1));
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let csv_content = "type,user,amount\ncharge,1,100\ncharge,2,oops\nuse,3,50\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());

        let error = records[1].as_ref().unwrap_err();
        assert!(error.contains("Line 3")); // Line 3 because of header
        assert!(error.contains("Invalid amount"));
    }

    #[test]
    fn test_sync_reader_reports_unparseable_user() {
        let csv_content = "type,user,amount\ncharge,alice,100\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 1);
        let error = records[0].as_ref().unwrap_err();
        assert!(error.contains("Line 2: CSV parse error"));
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let csv_content = "type,user,amount\n  Charge  ,  4  ,  25  \n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let commands: Vec<_> = reader.filter_map(Result::ok).collect();

        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].user_id, 4);
        assert_eq!(commands[0].amount, 25);
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("type,user,amount\n");

        let reader = SyncReader::new(file.path()).unwrap();

        assert_eq!(reader.count(), 0);
    }
}
