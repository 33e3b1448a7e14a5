use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::errors::CaseCountError;
use crate::source::date_helpers::report_file_name;
use crate::transport::ReportFetcher;
use crate::types::SourceId;

/// Local path of the cached report for `date` under `dir`.
pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(report_file_name(date))
}

/// Open a report for buffered line reading.
pub fn open_report(path: &Path) -> Result<BufReader<File>, CaseCountError> {
    Ok(BufReader::new(File::open(path)?))
}

/// Offline fetcher over an existing report directory.
///
/// Never contacts a remote origin; a missing day is a fetch failure.
#[derive(Clone, Debug)]
pub struct LocalReportDir {
    root: PathBuf,
}

impl LocalReportDir {
    /// Create a fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory reports are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ReportFetcher for LocalReportDir {
    fn source_id(&self, date: NaiveDate) -> SourceId {
        report_path(&self.root, date).display().to_string()
    }

    fn ensure_local(&self, date: NaiveDate) -> Result<PathBuf, CaseCountError> {
        let path = report_path(&self.root, date);
        if path.is_file() {
            debug!("[casecount:fs] using local report {}", path.display());
            return Ok(path);
        }
        Err(CaseCountError::Fetch {
            source_id: path.display().to_string(),
            reason: "report not present in offline directory".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::BufRead;
    use tempfile::tempdir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 9).unwrap()
    }

    #[test]
    fn report_path_uses_report_file_name() {
        let path = report_path(Path::new("data"), day());
        assert_eq!(path, Path::new("data").join("03-09-2020.csv"));
    }

    #[test]
    fn local_dir_returns_existing_report() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("03-09-2020.csv"), "a\nb\n").unwrap();
        let dir = LocalReportDir::new(temp.path());

        let path = dir.ensure_local(day()).unwrap();
        let lines: Vec<String> = open_report(&path)
            .unwrap()
            .lines()
            .map(Result::unwrap)
            .collect();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn local_dir_reports_missing_day_as_fetch_error() {
        let temp = tempdir().unwrap();
        let dir = LocalReportDir::new(temp.path());
        match dir.ensure_local(day()).unwrap_err() {
            CaseCountError::Fetch { source_id, .. } => {
                assert!(source_id.ends_with("03-09-2020.csv"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
