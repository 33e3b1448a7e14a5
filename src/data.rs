use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::types::{Count, CountryName, MetricName, RegionName};

/// One observation for a `(country, region, date)` triple.
///
/// Serialized with the report feed's PascalCase field names; `calculated`
/// stays empty until the derive pass runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// Calendar day of the observation (timestamps are truncated to a day).
    #[serde(with = "report_date")]
    pub date: NaiveDate,
    /// Country after alias canonicalization.
    pub country: CountryName,
    /// Region within the country; empty for country-level rows.
    pub region: RegionName,
    pub confirmed: Count,
    pub deaths: Count,
    pub recovered: Count,
    /// `confirmed - deaths - recovered`, not clamped.
    pub active: Count,
    /// Derived metrics keyed by name; absent means "not yet applicable".
    #[serde(default)]
    pub calculated: BTreeMap<MetricName, Count>,
}

impl Record {
    /// Build a record with `active` derived from the three reported totals.
    pub fn new(
        date: NaiveDate,
        country: impl Into<CountryName>,
        region: impl Into<RegionName>,
        confirmed: Count,
        deaths: Count,
        recovered: Count,
    ) -> Self {
        Self {
            date,
            country: country.into(),
            region: region.into(),
            confirmed,
            deaths,
            recovered,
            active: confirmed - deaths - recovered,
            calculated: BTreeMap::new(),
        }
    }

    /// Key under which this record's counts accumulate.
    pub fn key(&self) -> AggregationKey {
        AggregationKey {
            country: self.country.clone(),
            region: self.region.clone(),
            date: self.date,
        }
    }

    /// Reported (or derived, for `Active`) value of `metric`.
    pub fn value(&self, metric: Metric) -> Count {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
            Metric::Active => self.active,
        }
    }

    /// Fold another observation for the same key into this one.
    pub fn merge(&mut self, other: &Record) {
        self.confirmed += other.confirmed;
        self.deaths += other.deaths;
        self.recovered += other.recovered;
        self.active += other.active;
    }

    /// Look up a derived metric.
    pub fn calculated(&self, name: &str) -> Option<Count> {
        self.calculated.get(name).copied()
    }
}

/// `(country, region, date)` tuple running totals are keyed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AggregationKey {
    pub country: CountryName,
    pub region: RegionName,
    pub date: NaiveDate,
}

impl AggregationKey {
    /// The same location one day earlier, or `None` at the calendar floor.
    pub fn previous_day(&self) -> Option<AggregationKey> {
        Some(AggregationKey {
            country: self.country.clone(),
            region: self.region.clone(),
            date: self.date.pred_opt()?,
        })
    }
}

/// Counted quantity tracked by the counter store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
    Active,
}

impl Metric {
    /// Lowercase metric name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
            Metric::Active => "active",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running totals for one key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub confirmed: Count,
    pub deaths: Count,
    pub recovered: Count,
    pub active: Count,
}

impl Totals {
    /// Add a record's four counts.
    pub fn add(&mut self, record: &Record) {
        self.confirmed += record.confirmed;
        self.deaths += record.deaths;
        self.recovered += record.recovered;
        self.active += record.active;
    }

    /// Running total of `metric`.
    pub fn get(&self, metric: Metric) -> Count {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
            Metric::Active => self.active,
        }
    }
}

/// Serde adapter writing dates as midnight-UTC timestamps and reading either
/// timestamps or plain dates.
pub(crate) mod report_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::source::date_helpers::parse_report_date;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%dT00:00:00Z"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_report_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    #[test]
    fn new_derives_active_without_clamping() {
        let record = Record::new(day(1), "Italy", "", 5, 4, 3);
        assert_eq!(record.active, -2);
        assert!(record.calculated.is_empty());
    }

    #[test]
    fn merge_sums_every_count() {
        let mut left = Record::new(day(1), "China", "Hubei", 10, 1, 2);
        let right = Record::new(day(1), "China", "Hubei", 5, 0, 1);
        left.merge(&right);
        assert_eq!(
            (left.confirmed, left.deaths, left.recovered, left.active),
            (15, 1, 3, 11)
        );
    }

    #[test]
    fn previous_day_keeps_location() {
        let key = Record::new(day(2), "US", "Washington", 1, 0, 0).key();
        let prev = key.previous_day().unwrap();
        assert_eq!(prev.date, day(1));
        assert_eq!(prev.country, "US");
        assert_eq!(prev.region, "Washington");
    }

    #[test]
    fn record_json_uses_pascal_case_and_timestamp_dates() {
        let mut record = Record::new(day(5), "X", "", 12, 0, 0);
        record.calculated.insert("ConfirmedDelta".to_string(), 7);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Date"], "2020-03-05T00:00:00Z");
        assert_eq!(json["Country"], "X");
        assert_eq!(json["Active"], 12);
        assert_eq!(json["Calculated"]["ConfirmedDelta"], 7);

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
