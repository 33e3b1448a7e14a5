use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::constants::reports::{
    DEFAULT_CACHE_DIR, DEFAULT_REMOTE_BASE_URL, PARTIAL_DOWNLOAD_EXTENSION,
};
use crate::errors::CaseCountError;
use crate::source::date_helpers::report_file_name;
use crate::transport::ReportFetcher;
use crate::transport::fs::report_path;
use crate::types::SourceId;

/// Configuration for the remote report cache.
#[derive(Clone, Debug)]
pub struct FetcherConfig {
    /// Remote directory URL; `<base_url>/<MM-DD-YYYY>.csv` is fetched per day.
    pub base_url: String,
    /// Local directory reports are cached in.
    pub cache_dir: PathBuf,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl FetcherConfig {
    /// Override the remote base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the local cache directory.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }
}

/// Fetch-on-miss report cache backed by HTTP.
///
/// A cached file is reused forever. Downloads land in a `.part` file that is
/// renamed into place only after the body is fully written, so an aborted
/// download never leaves a truncated report in the cache.
#[derive(Clone, Debug)]
pub struct RemoteReportCache {
    config: FetcherConfig,
}

impl RemoteReportCache {
    /// Create a cache from configuration.
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Remote URL of the report for `date`.
    pub fn url_for_date(&self, date: NaiveDate) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            report_file_name(date)
        )
    }

    /// Local cache path of the report for `date`.
    pub fn path_for_date(&self, date: NaiveDate) -> PathBuf {
        report_path(&self.config.cache_dir, date)
    }

    fn download(&self, url: &str, target: &Path) -> Result<u64, CaseCountError> {
        let fetch_error = |reason: String| CaseCountError::Fetch {
            source_id: url.to_string(),
            reason,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                fetch_error(format!(
                    "failed creating cache dir {}: {err}",
                    parent.display()
                ))
            })?;
        }
        let temp_target = target.with_extension(PARTIAL_DOWNLOAD_EXTENSION);
        if temp_target.exists() {
            let _ = fs::remove_file(&temp_target);
        }

        let response = ureq::get(url)
            .call()
            .map_err(|err| fetch_error(err.to_string()))?;
        let mut reader = response.into_body().into_reader();
        let mut file = File::create(&temp_target).map_err(|err| {
            fetch_error(format!(
                "failed creating {}: {err}",
                temp_target.display()
            ))
        })?;
        let written = io::copy(&mut reader, &mut file).map_err(|err| {
            let _ = fs::remove_file(&temp_target);
            fetch_error(format!("failed reading response body: {err}"))
        })?;
        drop(file);

        fs::rename(&temp_target, target).map_err(|err| {
            fetch_error(format!(
                "failed moving {} -> {}: {err}",
                temp_target.display(),
                target.display()
            ))
        })?;
        Ok(written)
    }
}

impl ReportFetcher for RemoteReportCache {
    fn source_id(&self, date: NaiveDate) -> SourceId {
        self.url_for_date(date)
    }

    fn ensure_local(&self, date: NaiveDate) -> Result<PathBuf, CaseCountError> {
        let target = self.path_for_date(date);
        if target.is_file() {
            debug!("[casecount:fetch] cache hit {}", target.display());
            return Ok(target);
        }

        let url = self.url_for_date(date);
        let started = Instant::now();
        let bytes = self.download(&url, &target)?;
        info!(
            "[casecount:fetch] downloaded {} -> {} ({:.1} KiB in {:.1}s)",
            url,
            target.display(),
            bytes as f64 / 1024.0,
            started.elapsed().as_secs_f64()
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 22).unwrap()
    }

    #[test]
    fn builds_dated_urls_and_paths() {
        let cache = RemoteReportCache::new(
            FetcherConfig::default()
                .with_base_url("https://example.invalid/reports/")
                .with_cache_dir("cache"),
        );
        assert_eq!(
            cache.url_for_date(day()),
            "https://example.invalid/reports/01-22-2020.csv"
        );
        assert_eq!(cache.path_for_date(day()), Path::new("cache").join("01-22-2020.csv"));
        assert_eq!(cache.source_id(day()), cache.url_for_date(day()));
    }

    #[test]
    fn cached_report_is_reused_without_network() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("01-22-2020.csv"), "cached").unwrap();
        let cache = RemoteReportCache::new(
            FetcherConfig::default()
                .with_base_url("http://127.0.0.1:9")
                .with_cache_dir(temp.path()),
        );
        let path = cache.ensure_local(day()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "cached");
    }

    #[test]
    fn failed_download_is_a_fetch_error_naming_the_url() {
        let temp = tempdir().unwrap();
        let cache = RemoteReportCache::new(
            FetcherConfig::default()
                .with_base_url("http://127.0.0.1:9")
                .with_cache_dir(temp.path()),
        );
        match cache.ensure_local(day()).unwrap_err() {
            CaseCountError::Fetch { source_id, .. } => {
                assert_eq!(source_id, "http://127.0.0.1:9/01-22-2020.csv");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!temp.path().join("01-22-2020.csv").exists());
        assert!(!temp.path().join("01-22-2020.part").exists());
    }
}
