//! Report parsing: header inference, row normalization, and date helpers.
//!
//! Ownership model:
//! - `HeaderMapping` is inferred once per report from its first line.
//! - `normalize_row` turns each later line into `NormalizedRow` values.
//! - `read_report` drains one report stream into dated `Record`s.

use std::io::BufRead;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::data::Record;
use crate::errors::CaseCountError;

/// Date parsing, report file naming, and day-range helpers.
pub mod date_helpers;
/// Column-role inference from header rows.
pub mod header;
/// Raw line to row-value normalization.
pub mod rows;
/// Per-status JSON input mode.
pub mod status;

pub use header::{ColumnRole, HeaderMapping};
pub use rows::{NormalizedRow, normalize_row};
pub use status::{CaseStatus, StatusRow, fold_status_rows, read_status_rows};

/// Read one report: map its header, then normalize every data line.
///
/// Every record is stamped with `date`. Blank lines are skipped. A report
/// with no header yields no records; a header that cannot be mapped aborts
/// before any data line is read.
pub fn read_report<R: BufRead>(
    reader: R,
    source_id: &str,
    date: NaiveDate,
) -> Result<Vec<Record>, CaseCountError> {
    let mut lines = reader.lines();
    let mapping = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                break HeaderMapping::from_header(&line, source_id)?;
            }
            None => {
                warn!("[casecount:source] report '{}' is empty", source_id);
                return Ok(Vec::new());
            }
        }
    };
    debug!("[casecount:source] report '{}' mapping {:?}", source_id, mapping);

    let mut records = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(normalize_row(&line, &mapping).into_record(date));
    }
    Ok(records)
}
