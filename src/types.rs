/// Identifier for the report a row or error came from (local path or remote URL).
/// Examples: `data/03-01-2020.csv`, `https://raw.githubusercontent.com/.../03-01-2020.csv`
pub type SourceId = String;
/// Country name after alias canonicalization.
/// Examples: `China`, `Italy`, `US`
pub type CountryName = String;
/// Sub-country region name; empty for country-level observations.
/// Examples: `Hubei`, `New York`, ``
pub type RegionName = String;
/// Name of a derived metric stored in `Record::calculated`.
/// Examples: `DaysSince10Confirmed`, `ConfirmedDelta`
pub type MetricName = String;
/// Name of a semantic column role inferred from a header row.
/// Examples: `country`, `region`, `confirmed`
pub type RoleName = String;
/// Raw, unparsed text line read from a report.
/// Example: `Hubei,Mainland China,1/22/2020 17:00,444,17,28`
pub type RawLine = String;
/// Signed case count. Source totals are non-negative, but active counts and
/// deltas may go below zero when reports are inconsistent or revised.
pub type Count = i64;
