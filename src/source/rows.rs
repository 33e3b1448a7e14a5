use chrono::NaiveDate;
use tracing::debug;

use crate::constants::schema::COUNTRY_ALIASES;
use crate::data::Record;
use crate::source::header::{ColumnRole, HeaderMapping};
use crate::types::{Count, CountryName, RegionName};

/// Row values extracted through a `HeaderMapping`, not yet stamped with a date.
///
/// Early reports carry no usable date column, so the caller supplies the
/// logical day being processed via `into_record`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedRow {
    pub country: CountryName,
    pub region: RegionName,
    pub confirmed: Count,
    pub deaths: Count,
    pub recovered: Count,
}

impl NormalizedRow {
    /// Stamp the row with its report day.
    pub fn into_record(self, date: NaiveDate) -> Record {
        Record::new(
            date,
            self.country,
            self.region,
            self.confirmed,
            self.deaths,
            self.recovered,
        )
    }
}

/// Convert one raw data line into row values.
///
/// Quotes are stripped and fields split on every comma; quoted commas are
/// not supported. Missing fields read as empty and numeric fields that do
/// not parse read as zero.
pub fn normalize_row(line: &str, mapping: &HeaderMapping) -> NormalizedRow {
    let cleaned = line.replace('"', "");
    let fields: Vec<&str> = cleaned.trim().split(',').collect();
    let text = |role: ColumnRole| {
        fields
            .get(mapping.column(role))
            .map(|value| value.trim())
            .unwrap_or_default()
    };

    NormalizedRow {
        country: canonical_country(text(ColumnRole::Country)),
        region: text(ColumnRole::Region).to_string(),
        confirmed: parse_count(text(ColumnRole::Confirmed), ColumnRole::Confirmed),
        deaths: parse_count(text(ColumnRole::Deaths), ColumnRole::Deaths),
        recovered: parse_count(text(ColumnRole::Recovered), ColumnRole::Recovered),
    }
}

/// Map historical country aliases onto their canonical name.
pub fn canonical_country(name: &str) -> CountryName {
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Parse a count field, reading blanks and malformed values as zero.
pub fn parse_count(value: &str, role: ColumnRole) -> Count {
    if value.is_empty() {
        return 0;
    }
    match value.parse::<Count>() {
        Ok(count) => count,
        Err(err) => {
            debug!(
                "[casecount:rows] malformed {} value '{}' read as 0: {err}",
                role, value
            );
            0
        }
    }
}
