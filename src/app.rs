//! Command-line runner shared by the `casecount` binary.

use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, error::ErrorKind};
use tracing::info;

use crate::config::PipelineConfig;
use crate::constants::first_report_date;
use crate::constants::reports::{DEFAULT_CACHE_DIR, DEFAULT_REMOTE_BASE_URL};
use crate::output::{OutputFormat, write_records};
use crate::pipeline::{fetcher_for, run_reports, run_status_feeds};
use crate::transport::FetcherConfig;

#[derive(Debug, Parser)]
#[command(
    name = "casecount",
    disable_help_subcommand = true,
    about = "Aggregate daily case-count reports into time-series records",
    long_about = "Fetch (or reuse cached) daily case-count reports, normalize their varying schemas, and emit per-location daily records with deltas and days-since-threshold counters.",
    after_help = "Set RUST_LOG=casecount=debug for per-day progress on stderr."
)]
struct CaseCountCli {
    #[arg(
        long,
        default_value = "bulk",
        value_name = "bulk|csv|json",
        help = "Output shape"
    )]
    format: String,
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        value_parser = parse_date_arg,
        help = "First report day (defaults to the first published report)"
    )]
    from: Option<NaiveDate>,
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        value_parser = parse_date_arg,
        help = "Last report day (defaults to yesterday, UTC)"
    )]
    to: Option<NaiveDate>,
    #[arg(
        long = "cache-dir",
        value_name = "DIR",
        default_value = DEFAULT_CACHE_DIR,
        help = "Directory daily reports are cached in"
    )]
    cache_dir: PathBuf,
    #[arg(
        long = "base-url",
        value_name = "URL",
        default_value = DEFAULT_REMOTE_BASE_URL,
        help = "Remote directory holding MM-DD-YYYY.csv reports"
    )]
    base_url: String,
    #[arg(long, help = "Only read cached reports; a missing day fails the run")]
    offline: bool,
    #[arg(
        long = "status-json",
        value_name = "PATH",
        help = "Read per-status JSON feeds instead of daily reports, repeat as needed"
    )]
    status_json: Vec<PathBuf>,
    #[arg(
        long,
        short = 'o',
        value_name = "PATH",
        help = "Write output to a file instead of stdout"
    )]
    output: Option<PathBuf>,
}

/// Parse arguments, run the pipeline, and write the selected output.
///
/// Output is written only after the whole run succeeds; without `--output`
/// it goes to `stdout`.
pub fn run<I>(args_iter: I, stdout: &mut dyn Write) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<CaseCountCli, _>(std::iter::once("casecount".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let format: OutputFormat = cli.format.parse()?;

    let records = if cli.status_json.is_empty() {
        let config = PipelineConfig::default()
            .with_start(cli.from.unwrap_or_else(first_report_date))
            .with_fetcher(
                FetcherConfig::default()
                    .with_base_url(cli.base_url)
                    .with_cache_dir(cli.cache_dir),
            )
            .with_offline(cli.offline);
        let config = match cli.to {
            Some(to) => config.with_end(to),
            None => config,
        };
        let fetcher = fetcher_for(&config);
        run_reports(&config, fetcher.as_ref())?
    } else {
        run_status_feeds(&cli.status_json)?
    };

    match cli.output {
        Some(path) => {
            let file = BufWriter::new(File::create(&path)?);
            write_records(format, &records, file)?;
            info!(
                "[casecount:app] wrote {} records as {} to {}",
                records.len(),
                format,
                path.display()
            );
        }
        None => write_records(format, &records, stdout)?,
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}': expected YYYY-MM-DD", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CaseCountError;
    use std::fs;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_date_args() {
        assert_eq!(
            parse_date_arg("2020-03-01"),
            Ok(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap())
        );
        assert!(parse_date_arg("03/01/2020").is_err());
    }

    #[test]
    fn unsupported_format_fails_before_any_fetch() {
        let temp = tempdir().unwrap();
        let cache = temp.path().to_string_lossy().to_string();
        let mut out = Vec::new();
        let err = run(
            args(&["--format", "xml", "--offline", "--cache-dir", &cache]),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CaseCountError>(),
            Some(CaseCountError::UnsupportedFormat(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn help_exits_cleanly() {
        let mut out = Vec::new();
        run(args(&["--help"]), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn offline_run_writes_csv() {
        let temp = tempdir().unwrap();
        let header = "Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered\n";
        fs::write(
            temp.path().join("03-01-2020.csv"),
            format!("{header},X,2020-03-01T10:00:00,5,0,0\n"),
        )
        .unwrap();
        fs::write(
            temp.path().join("03-02-2020.csv"),
            format!("{header},X,2020-03-02T10:00:00,12,0,0\n"),
        )
        .unwrap();
        let cache = temp.path().to_string_lossy().to_string();

        let mut out = Vec::new();
        run(
            args(&[
                "--format",
                "csv",
                "--offline",
                "--cache-dir",
                &cache,
                "--from",
                "2020-03-01",
                "--to",
                "2020-03-02",
            ]),
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("2020-03-02,1,X,12,0,0,7,0,0,12"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn missing_offline_day_writes_nothing() {
        let temp = tempdir().unwrap();
        let cache = temp.path().to_string_lossy().to_string();
        let mut out = Vec::new();
        let err = run(
            args(&[
                "--format",
                "json",
                "--offline",
                "--cache-dir",
                &cache,
                "--from",
                "2020-03-01",
                "--to",
                "2020-03-01",
            ]),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CaseCountError>(),
            Some(CaseCountError::Fetch { .. })
        ));
        assert!(out.is_empty());
    }
}
