#![doc = include_str!("../README.md")]

/// Command-line runner used by the `casecount` binary.
pub mod app;
/// Run configuration types.
pub mod config;
/// Centralized constants: feed locations, role names, thresholds, metric names.
pub mod constants;
/// Running totals and first threshold-crossing dates.
pub mod counters;
/// Record, aggregation key, and metric types.
pub mod data;
/// Derive pass computing deltas and days-since-threshold counters.
pub mod derive;
/// Output shapes (bulk-index, CSV, JSON).
pub mod output;
/// Two-pass run driver.
pub mod pipeline;
/// Report parsing: header inference, row normalization, per-status feeds.
pub mod source;
/// Report transports: remote cache and local directory.
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::PipelineConfig;
pub use counters::{CounterStore, CrossingKey};
pub use data::{AggregationKey, Metric, Record, Totals};
pub use derive::{derive_all, derive_record};
pub use errors::CaseCountError;
pub use output::{OutputFormat, write_records};
pub use pipeline::{Pipeline, run_reports, run_status_feeds};
pub use source::{ColumnRole, HeaderMapping, NormalizedRow, StatusRow, normalize_row};
pub use transport::{FetcherConfig, LocalReportDir, RemoteReportCache, ReportFetcher};
pub use types::{Count, CountryName, MetricName, RegionName, RoleName, SourceId};
