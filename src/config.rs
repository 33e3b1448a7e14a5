use chrono::NaiveDate;

use crate::constants::first_report_date;
use crate::errors::CaseCountError;
use crate::source::date_helpers::yesterday_utc;
use crate::transport::FetcherConfig;

/// Top-level run configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// First report day to ingest.
    pub start: NaiveDate,
    /// Last report day to ingest; `None` means yesterday (UTC) at run time.
    pub end: Option<NaiveDate>,
    /// Remote origin and local cache used to obtain reports.
    pub fetcher: FetcherConfig,
    /// Read only already-cached reports; a missing day fails the run.
    pub offline: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start: first_report_date(),
            end: None,
            fetcher: FetcherConfig::default(),
            offline: false,
        }
    }
}

impl PipelineConfig {
    /// Override the first day.
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    /// Override the last day.
    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Override fetcher settings.
    pub fn with_fetcher(mut self, fetcher: FetcherConfig) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Enable or disable offline mode.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Inclusive `(start, end)` day range, resolving a default end.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), CaseCountError> {
        let end = self.end.unwrap_or_else(yesterday_utc);
        if self.start > end {
            return Err(CaseCountError::Configuration(format!(
                "start date {} is after end date {}",
                self.start, end
            )));
        }
        Ok((self.start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_range_runs_from_first_report_to_yesterday() {
        let (start, end) = PipelineConfig::default().date_range().unwrap();
        assert_eq!(start, ymd(2020, 1, 22));
        assert_eq!(end, yesterday_utc());
    }

    #[test]
    fn explicit_range_is_kept() {
        let config = PipelineConfig::default()
            .with_start(ymd(2020, 3, 1))
            .with_end(ymd(2020, 3, 1));
        assert_eq!(config.date_range().unwrap(), (ymd(2020, 3, 1), ymd(2020, 3, 1)));
    }

    #[test]
    fn inverted_range_is_a_configuration_error() {
        let config = PipelineConfig::default()
            .with_start(ymd(2020, 3, 2))
            .with_end(ymd(2020, 3, 1));
        assert!(matches!(
            config.date_range(),
            Err(CaseCountError::Configuration(_))
        ));
    }
}
