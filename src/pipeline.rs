//! Two-pass run driver.
//!
//! Pass one ingests every day in ascending order into the `CounterStore`;
//! pass two derives each record from the completed store. Any error during
//! pass one aborts the run, so no partially derived series is produced.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::counters::CounterStore;
use crate::data::Record;
use crate::derive::derive_all;
use crate::errors::CaseCountError;
use crate::source::date_helpers::each_day;
use crate::source::{StatusRow, fold_status_rows, read_report, read_status_rows};
use crate::transport::fs::open_report;
use crate::transport::{LocalReportDir, RemoteReportCache, ReportFetcher};

/// Owns the counter store and the ingested records for one run.
#[derive(Debug, Default)]
pub struct Pipeline {
    store: CounterStore,
    records: Vec<Record>,
}

impl Pipeline {
    /// Create an empty run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one record and keep it for the derive pass.
    pub fn ingest(&mut self, record: Record) {
        self.store.accumulate(&record);
        self.records.push(record);
    }

    /// Read one report stream and ingest its rows stamped with `date`.
    ///
    /// The whole report is parsed before any row is accumulated, so a bad
    /// header leaves the store untouched.
    pub fn ingest_report<R: BufRead>(
        &mut self,
        reader: R,
        source_id: &str,
        date: NaiveDate,
    ) -> Result<usize, CaseCountError> {
        let records = read_report(reader, source_id, date)?;
        let count = records.len();
        for record in records {
            self.ingest(record);
        }
        debug!(
            "[casecount:pipeline] ingested {} rows from '{}' for {}",
            count, source_id, date
        );
        Ok(count)
    }

    /// Obtain the report for `date` from `fetcher` and ingest it.
    pub fn ingest_day(
        &mut self,
        fetcher: &dyn ReportFetcher,
        date: NaiveDate,
    ) -> Result<usize, CaseCountError> {
        let path = fetcher.ensure_local(date)?;
        let reader = open_report(&path)?;
        self.ingest_report(reader, &fetcher.source_id(date), date)
    }

    /// Ingest every day in the inclusive range, oldest first.
    pub fn ingest_range(
        &mut self,
        fetcher: &dyn ReportFetcher,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize, CaseCountError> {
        let mut days = 0usize;
        for date in each_day(from, to) {
            self.ingest_day(fetcher, date)?;
            days += 1;
        }
        info!(
            "[casecount:pipeline] ingested {} days ({} .. {}), {} rows, {} keys",
            days,
            from,
            to,
            self.records.len(),
            self.store.key_count()
        );
        Ok(days)
    }

    /// Fold per-status rows into records and ingest them in date order.
    pub fn ingest_status_rows(&mut self, rows: &[StatusRow]) -> usize {
        let records = fold_status_rows(rows);
        let count = records.len();
        for record in records {
            self.ingest(record);
        }
        info!(
            "[casecount:pipeline] folded {} status rows into {} records",
            rows.len(),
            count
        );
        count
    }

    /// Counter store built so far.
    pub fn store(&self) -> &CounterStore {
        &self.store
    }

    /// Records ingested so far, in ingestion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Run the derive pass and return the finished records in ingestion order.
    pub fn finish(self) -> Vec<Record> {
        let Pipeline { store, mut records } = self;
        derive_all(&mut records, &store);
        records
    }
}

/// Fetcher selected by configuration.
pub fn fetcher_for(config: &PipelineConfig) -> Box<dyn ReportFetcher> {
    if config.offline {
        Box::new(LocalReportDir::new(config.fetcher.cache_dir.clone()))
    } else {
        Box::new(RemoteReportCache::new(config.fetcher.clone()))
    }
}

/// Run over daily reports in the configured range with the given fetcher.
pub fn run_reports(
    config: &PipelineConfig,
    fetcher: &dyn ReportFetcher,
) -> Result<Vec<Record>, CaseCountError> {
    let (from, to) = config.date_range()?;
    let mut pipeline = Pipeline::new();
    pipeline.ingest_range(fetcher, from, to)?;
    Ok(pipeline.finish())
}

/// Run over per-status JSON feeds. Rows from every file are folded together.
pub fn run_status_feeds<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Record>, CaseCountError> {
    let mut rows = Vec::new();
    for path in paths {
        let file = File::open(path.as_ref())?;
        rows.extend(read_status_rows(BufReader::new(file))?);
    }
    let mut pipeline = Pipeline::new();
    pipeline.ingest_status_rows(&rows);
    Ok(pipeline.finish())
}
