//! CSV format handling for point commands and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain commands
//! - Balance report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{CommandKind, Point, PointCommand, UserId};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, user, amount
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: UserId,
    pub amount: Option<String>,
}

/// One row of the balance report
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct BalanceSummary {
    #[serde(rename = "user")]
    pub user_id: UserId,
    pub point: Point,
    /// Number of accepted charge/use records
    pub history: usize,
}

/// Convert a CsvRecord to a PointCommand
///
/// Command types are case-insensitive. Every command needs an integer amount;
/// zero and negative amounts are passed through so the engine can reject them
/// with its own error.
///
/// # Returns
///
/// * `Ok(PointCommand)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<PointCommand, String> {
    let kind = match csv_record.kind.to_lowercase().as_str() {
        "enroll" => CommandKind::Enroll,
        "charge" => CommandKind::Charge,
        "use" => CommandKind::Use,
        _ => {
            return Err(format!(
                "Invalid command type: '{}' for user {}",
                csv_record.kind, csv_record.user
            ))
        }
    };

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => amount_str
            .trim()
            .parse::<Point>()
            .map_err(|_| {
                format!(
                    "Invalid amount '{}' for user {}",
                    amount_str, csv_record.user
                )
            })?,
        _ => {
            return Err(format!(
                "{:?} command for user {} requires an amount",
                kind, csv_record.user
            ))
        }
    };

    Ok(PointCommand {
        kind,
        user_id: csv_record.user,
        amount,
    })
}

/// Write the balance report in CSV format
///
/// Columns: user, point, history. Rows are sorted by user id for
/// deterministic output.
pub fn write_balances_csv(
    summaries: &[BalanceSummary],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    let mut sorted = summaries.to_vec();
    sorted.sort_by_key(|summary| summary.user_id);

    if sorted.is_empty() {
        writer
            .write_record(["user", "point", "history"])
            .map_err(|e| format!("Failed to write CSV header: {}", e))?;
    }

    for summary in &sorted {
        writer
            .serialize(summary)
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
