//! Derive pass: threshold counters and day-over-day deltas.
//!
//! Runs only once every day has been ingested, so crossing dates and
//! previous-day totals are final when a record reads them.

use tracing::info;

use crate::constants::{DELTAS, THRESHOLDS};
use crate::counters::CounterStore;
use crate::data::Record;
use crate::source::date_helpers::days_between;

/// Populate `record.calculated` from a completed store.
///
/// `DaysSinceN*` is set only once the country's crossing date is on or
/// before the record's date. Deltas compare the key's total with the same
/// location's total one day earlier; with no earlier entry the delta is 0.
pub fn derive_record(record: &mut Record, store: &CounterStore) {
    for threshold in THRESHOLDS.iter() {
        let Some(crossed) = store.crossing_date(&record.country, threshold.metric, threshold.limit)
        else {
            continue;
        };
        let days = days_between(crossed, record.date);
        if days >= 0 {
            record.calculated.insert(threshold.days_since.to_string(), days);
        }
    }

    let key = record.key();
    let previous = key
        .previous_day()
        .and_then(|prev| store.totals(&prev).copied());
    for (metric, name) in DELTAS {
        let delta = match previous {
            Some(prev) => {
                let today = store.total(&key, metric).unwrap_or_else(|| record.value(metric));
                today - prev.get(metric)
            }
            None => 0,
        };
        record.calculated.insert(name.to_string(), delta);
    }
}

/// Derive every record in place, in the order given.
pub fn derive_all(records: &mut [Record], store: &CounterStore) {
    for record in records.iter_mut() {
        derive_record(record, store);
    }
    info!(
        "[casecount:derive] derived {} records over {} keys ({} threshold crossings)",
        records.len(),
        store.key_count(),
        store.crossing_count()
    );
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::constants::calculated::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    fn ingest(records: &[Record]) -> CounterStore {
        let mut store = CounterStore::new();
        records.iter().for_each(|record| store.accumulate(record));
        store
    }

    #[test]
    fn first_day_of_a_key_has_zero_deltas() {
        let mut records = vec![Record::new(day(1), "X", "", 5, 1, 0)];
        let store = ingest(&records);
        derive_all(&mut records, &store);
        assert_eq!(records[0].calculated(CONFIRMED_DELTA), Some(0));
        assert_eq!(records[0].calculated(DEATHS_DELTA), Some(0));
        assert_eq!(records[0].calculated(RECOVERED_DELTA), Some(0));
        assert_eq!(records[0].calculated(DAYS_SINCE_10_CONFIRMED), None);
    }

    #[test]
    fn deltas_subtract_previous_day_totals_without_clamping() {
        let mut records = vec![
            Record::new(day(1), "X", "", 20, 3, 5),
            Record::new(day(2), "X", "", 27, 2, 9),
        ];
        let store = ingest(&records);
        derive_all(&mut records, &store);
        assert_eq!(records[1].calculated(CONFIRMED_DELTA), Some(7));
        assert_eq!(records[1].calculated(DEATHS_DELTA), Some(-1));
        assert_eq!(records[1].calculated(RECOVERED_DELTA), Some(4));
    }

    #[test]
    fn deltas_are_per_region_and_need_the_immediately_previous_day() {
        let mut records = vec![
            Record::new(day(1), "X", "A", 5, 0, 0),
            Record::new(day(2), "X", "B", 8, 0, 0),
            Record::new(day(3), "X", "A", 9, 0, 0),
        ];
        let store = ingest(&records);
        derive_all(&mut records, &store);
        assert_eq!(records[1].calculated(CONFIRMED_DELTA), Some(0));
        // region A has a gap on day 2
        assert_eq!(records[2].calculated(CONFIRMED_DELTA), Some(0));
    }

    #[test]
    fn duplicate_rows_share_the_key_level_delta() {
        let mut records = vec![
            Record::new(day(1), "X", "", 10, 0, 0),
            Record::new(day(2), "X", "", 6, 0, 0),
            Record::new(day(2), "X", "", 9, 0, 0),
        ];
        let store = ingest(&records);
        derive_all(&mut records, &store);
        assert_eq!(records[1].calculated(CONFIRMED_DELTA), Some(5));
        assert_eq!(records[2].calculated(CONFIRMED_DELTA), Some(5));
    }

    #[test]
    fn days_since_thresholds_count_from_country_crossing() {
        let mut records = vec![
            Record::new(day(1), "X", "A", 8, 0, 0),
            Record::new(day(2), "X", "A", 9, 0, 0),
            Record::new(day(2), "X", "B", 9, 0, 0),
            Record::new(day(5), "X", "A", 150, 12, 0),
        ];
        let store = ingest(&records);
        derive_all(&mut records, &store);

        assert_eq!(records[0].calculated(DAYS_SINCE_10_CONFIRMED), None);
        assert_eq!(records[1].calculated(DAYS_SINCE_10_CONFIRMED), Some(0));
        assert_eq!(records[2].calculated(DAYS_SINCE_10_CONFIRMED), Some(0));
        assert_eq!(records[3].calculated(DAYS_SINCE_10_CONFIRMED), Some(3));
        assert_eq!(records[3].calculated(DAYS_SINCE_100_CONFIRMED), Some(0));
        assert_eq!(records[3].calculated(DAYS_SINCE_10_DEATHS), Some(0));
        assert_eq!(records[3].calculated(DAYS_SINCE_100_DEATHS), None);
    }

    #[test]
    fn records_before_a_later_crossing_get_no_days_since() {
        let mut early = Record::new(day(1), "X", "", 1, 0, 0);
        let store = ingest(&[
            Record::new(day(1), "X", "", 1, 0, 0),
            Record::new(day(4), "X", "", 40, 0, 0),
        ]);
        derive_record(&mut early, &store);
        assert_eq!(early.calculated(DAYS_SINCE_10_CONFIRMED), None);
    }
}
