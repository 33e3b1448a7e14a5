//! Per-status input mode.
//!
//! Some feeds publish one JSON object per `(location, status, day)` with an
//! incremental case count instead of one row carrying all three totals.
//! Rows are folded into one `Record` per aggregation key so the counter
//! store sees the same totals either way.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::data::Record;
use crate::errors::CaseCountError;
use crate::source::date_helpers::parse_report_date;
use crate::source::rows::canonical_country;
use crate::types::{Count, CountryName, RegionName};

/// Case status a per-status row reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseStatus {
    Confirmed,
    Deaths,
    Recovered,
}

impl FromStr for CaseStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(CaseStatus::Confirmed),
            "deaths" | "death" => Ok(CaseStatus::Deaths),
            "recovered" => Ok(CaseStatus::Recovered),
            other => Err(format!("unknown case status '{other}'")),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CaseStatus::Confirmed => "confirmed",
            CaseStatus::Deaths => "deaths",
            CaseStatus::Recovered => "recovered",
        })
    }
}

/// One per-status observation as published.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusRow {
    pub country: CountryName,
    #[serde(default, alias = "Region")]
    pub province: RegionName,
    pub status: String,
    #[serde(default)]
    pub cases: Count,
    pub date: String,
}

impl StatusRow {
    /// Convert into a partial record carrying only this row's status count.
    ///
    /// Returns `None` (with a warning) when the date or status is unusable.
    pub fn to_record(&self) -> Option<Record> {
        let Some(date) = parse_report_date(&self.date) else {
            warn!(
                "[casecount:status] skipping row for '{}' with unparseable date '{}'",
                self.country, self.date
            );
            return None;
        };
        let status = match self.status.parse::<CaseStatus>() {
            Ok(status) => status,
            Err(reason) => {
                warn!(
                    "[casecount:status] skipping row for '{}' on {}: {reason}",
                    self.country, date
                );
                return None;
            }
        };
        let (confirmed, deaths, recovered) = match status {
            CaseStatus::Confirmed => (self.cases, 0, 0),
            CaseStatus::Deaths => (0, self.cases, 0),
            CaseStatus::Recovered => (0, 0, self.cases),
        };
        Some(Record::new(
            date,
            canonical_country(self.country.trim()),
            self.province.trim(),
            confirmed,
            deaths,
            recovered,
        ))
    }
}

/// Read a JSON array of status rows.
pub fn read_status_rows<R: Read>(reader: R) -> Result<Vec<StatusRow>, CaseCountError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Fold status rows into one record per `(country, region, date)`.
///
/// Output is ordered by date, then country, then region, which is the
/// ascending-day order ingestion requires.
pub fn fold_status_rows(rows: &[StatusRow]) -> Vec<Record> {
    let mut folded: BTreeMap<(NaiveDate, CountryName, RegionName), Record> = BTreeMap::new();
    for record in rows.iter().filter_map(StatusRow::to_record) {
        let key = (record.date, record.country.clone(), record.region.clone());
        match folded.get_mut(&key) {
            Some(existing) => existing.merge(&record),
            None => {
                folded.insert(key, record);
            }
        }
    }
    folded.into_values().collect()
}
