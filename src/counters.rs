//! Run-scoped running totals and first threshold-crossing dates.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::constants::THRESHOLDS;
use crate::data::{AggregationKey, Metric, Record, Totals};
use crate::types::{Count, CountryName};

/// Identifies one tracked `(country, metric, threshold)` crossing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CrossingKey {
    pub country: CountryName,
    pub metric: Metric,
    pub limit: Count,
}

/// Accumulator shared by ingestion and the derive pass for one run.
///
/// Totals only ever grow by addition and crossing dates are written once,
/// so ingesting a day's rows in any order yields the same store.
#[derive(Clone, Debug, Default)]
pub struct CounterStore {
    totals: HashMap<AggregationKey, Totals>,
    country_totals: HashMap<(CountryName, NaiveDate), Totals>,
    crossings: HashMap<CrossingKey, NaiveDate>,
}

impl CounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record's counts to its key and to its country's day total, then
    /// record any threshold the country total now exceeds for the first time.
    pub fn accumulate(&mut self, record: &Record) {
        self.totals.entry(record.key()).or_default().add(record);
        let country_total = {
            let entry = self
                .country_totals
                .entry((record.country.clone(), record.date))
                .or_default();
            entry.add(record);
            *entry
        };
        self.record_crossings(&record.country, record.date, &country_total);
    }

    /// Record `date` for every threshold `country_total` exceeds that has no
    /// crossing date yet.
    fn record_crossings(&mut self, country: &str, date: NaiveDate, country_total: &Totals) {
        for threshold in THRESHOLDS.iter() {
            if country_total.get(threshold.metric) <= threshold.limit {
                continue;
            }
            self.crossings
                .entry(CrossingKey {
                    country: country.to_string(),
                    metric: threshold.metric,
                    limit: threshold.limit,
                })
                .or_insert(date);
        }
    }

    /// Running totals for a key, if any record was ingested for it.
    pub fn totals(&self, key: &AggregationKey) -> Option<&Totals> {
        self.totals.get(key)
    }

    /// Running total of `metric` for a key.
    pub fn total(&self, key: &AggregationKey, metric: Metric) -> Option<Count> {
        self.totals(key).map(|totals| totals.get(metric))
    }

    /// Totals summed across every region of `country` on `date`.
    pub fn country_totals(&self, country: &str, date: NaiveDate) -> Option<&Totals> {
        self.country_totals.get(&(country.to_string(), date))
    }

    /// First date `country`'s total for `metric` exceeded `limit`.
    pub fn crossing_date(&self, country: &str, metric: Metric, limit: Count) -> Option<NaiveDate> {
        self.crossings
            .get(&CrossingKey {
                country: country.to_string(),
                metric,
                limit,
            })
            .copied()
    }

    /// Number of distinct aggregation keys seen.
    pub fn key_count(&self) -> usize {
        self.totals.len()
    }

    /// Number of crossing dates recorded.
    pub fn crossing_count(&self) -> usize {
        self.crossings.len()
    }

    /// True if nothing has been ingested.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
