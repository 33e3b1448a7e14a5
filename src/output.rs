//! Output shapes for finished records.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde_json::json;

use crate::constants::CSV_HEADER;
use crate::constants::calculated::{
    CONFIRMED_DELTA, DAYS_SINCE_10_CONFIRMED, DEATHS_DELTA, RECOVERED_DELTA,
};
use crate::data::Record;
use crate::errors::CaseCountError;

/// Selectable output shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bulk-index JSON lines: an `{"index":{"_id":i}}` action before each record.
    Bulk,
    /// One CSV line per record with a per-country `Day` counter.
    Csv,
    /// A single JSON array of every record.
    Json,
}

impl OutputFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Bulk => "bulk",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CaseCountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bulk" | "elastic" => Ok(OutputFormat::Bulk),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CaseCountError::UnsupportedFormat(value.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records whose country has passed 10 confirmed cases by the record's date.
///
/// Bulk and CSV output only carry these; earlier records still feed counters.
pub fn charted_records(records: &[Record]) -> impl Iterator<Item = &Record> {
    records
        .iter()
        .filter(|record| record.calculated(DAYS_SINCE_10_CONFIRMED).is_some())
}

/// Write `records` to `writer` in `format`.
pub fn write_records<W: Write>(
    format: OutputFormat,
    records: &[Record],
    writer: W,
) -> Result<(), CaseCountError> {
    match format {
        OutputFormat::Bulk => write_bulk(records, writer),
        OutputFormat::Csv => write_csv(records, writer),
        OutputFormat::Json => write_json(records, writer),
    }
}

fn write_bulk<W: Write>(records: &[Record], mut writer: W) -> Result<(), CaseCountError> {
    for (id, record) in charted_records(records).enumerate() {
        serde_json::to_writer(&mut writer, &json!({ "index": { "_id": id } }))?;
        writer.write_all(b"\n")?;
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<(), CaseCountError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for record in charted_records(records) {
        let metric = |name: &str| record.calculated(name).unwrap_or(0).to_string();
        let day = record.calculated(DAYS_SINCE_10_CONFIRMED).unwrap_or(0) + 1;
        csv.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            day.to_string(),
            record.country.clone(),
            record.confirmed.to_string(),
            record.deaths.to_string(),
            record.recovered.to_string(),
            metric(CONFIRMED_DELTA),
            metric(DEATHS_DELTA),
            metric(RECOVERED_DELTA),
            record.active.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

fn write_json<W: Write>(records: &[Record], mut writer: W) -> Result<(), CaseCountError> {
    serde_json::to_writer(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
