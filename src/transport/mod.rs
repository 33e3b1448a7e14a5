//! Report transports: where a day's report bytes come from.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::errors::CaseCountError;
use crate::types::SourceId;

/// Remote download with a write-once local cache.
pub mod fetch;
/// Local report directory access.
pub mod fs;

pub use fetch::{FetcherConfig, RemoteReportCache};
pub use fs::LocalReportDir;

/// Provides a locally readable copy of a day's report.
///
/// Implementations fetch from their origin only when no local copy exists;
/// a published report is assumed immutable.
pub trait ReportFetcher {
    /// Identifier of the report for `date` used in logs and errors.
    fn source_id(&self, date: NaiveDate) -> SourceId;

    /// Ensure the report for `date` exists locally and return its path.
    ///
    /// Failures are reported as `CaseCountError::Fetch` naming `source_id`.
    fn ensure_local(&self, date: NaiveDate) -> Result<PathBuf, CaseCountError>;
}
