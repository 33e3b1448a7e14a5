use chrono::NaiveDate;

use crate::data::Metric;

/// Constants describing the upstream daily report feed.
pub mod reports {
    /// First calendar day (year, month, day) a daily report was published.
    pub const FIRST_REPORT_YMD: (i32, u32, u32) = (2020, 1, 22);
    /// Remote directory holding one `MM-DD-YYYY.csv` file per day.
    pub const DEFAULT_REMOTE_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_daily_reports";
    /// Local directory used to cache downloaded reports.
    pub const DEFAULT_CACHE_DIR: &str = "data";
    /// `chrono` format used to name report files.
    pub const REPORT_FILE_DATE_FORMAT: &str = "%m-%d-%Y";
    /// Extension of report files, local and remote.
    pub const REPORT_FILE_EXTENSION: &str = "csv";
    /// Suffix used for in-flight downloads before they are renamed into place.
    pub const PARTIAL_DOWNLOAD_EXTENSION: &str = "part";
}

/// Constants used by header inference and row normalization.
pub mod schema {
    /// Role name for the country column.
    pub const ROLE_COUNTRY: &str = "country";
    /// Role name for the region/province column.
    pub const ROLE_REGION: &str = "region";
    /// Role name for the confirmed-cases column.
    pub const ROLE_CONFIRMED: &str = "confirmed";
    /// Role name for the deaths column.
    pub const ROLE_DEATHS: &str = "deaths";
    /// Role name for the recovered column.
    pub const ROLE_RECOVERED: &str = "recovered";
    /// Historical country aliases and their canonical names.
    pub const COUNTRY_ALIASES: &[(&str, &str)] = &[("Mainland China", "China")];
}

/// Metric names written into `Record::calculated` by the derive pass.
pub mod calculated {
    pub const DAYS_SINCE_10_CONFIRMED: &str = "DaysSince10Confirmed";
    pub const DAYS_SINCE_100_CONFIRMED: &str = "DaysSince100Confirmed";
    pub const DAYS_SINCE_10_DEATHS: &str = "DaysSince10Deaths";
    pub const DAYS_SINCE_100_DEATHS: &str = "DaysSince100Deaths";
    pub const CONFIRMED_DELTA: &str = "ConfirmedDelta";
    pub const DEATHS_DELTA: &str = "DeathsDelta";
    pub const RECOVERED_DELTA: &str = "RecoveredDelta";
}

/// Column headers of the CSV output shape.
pub const CSV_HEADER: [&str; 10] = [
    "Date",
    "Day",
    "Country",
    "Confirmed",
    "Deaths",
    "Recovered",
    "NewConfirmed",
    "NewDeaths",
    "NewRecovered",
    "Active",
];

/// A fixed threshold tracked per country and the metric name it derives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Threshold {
    /// Metric whose country-level total is compared.
    pub metric: Metric,
    /// Crossing happens once the total is strictly greater than this value.
    pub limit: i64,
    /// Name written into `Record::calculated` with the days-since count.
    pub days_since: &'static str,
}

/// Threshold pairs tracked for every country.
pub const THRESHOLDS: [Threshold; 4] = [
    Threshold {
        metric: Metric::Confirmed,
        limit: 10,
        days_since: calculated::DAYS_SINCE_10_CONFIRMED,
    },
    Threshold {
        metric: Metric::Confirmed,
        limit: 100,
        days_since: calculated::DAYS_SINCE_100_CONFIRMED,
    },
    Threshold {
        metric: Metric::Deaths,
        limit: 10,
        days_since: calculated::DAYS_SINCE_10_DEATHS,
    },
    Threshold {
        metric: Metric::Deaths,
        limit: 100,
        days_since: calculated::DAYS_SINCE_100_DEATHS,
    },
];

/// Metrics that receive a day-over-day delta, paired with the delta name.
pub const DELTAS: [(Metric, &str); 3] = [
    (Metric::Confirmed, calculated::CONFIRMED_DELTA),
    (Metric::Deaths, calculated::DEATHS_DELTA),
    (Metric::Recovered, calculated::RECOVERED_DELTA),
];

/// First calendar day a daily report exists for.
pub fn first_report_date() -> NaiveDate {
    let (year, month, day) = reports::FIRST_REPORT_YMD;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
