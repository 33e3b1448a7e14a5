use std::io;

use thiserror::Error;

use crate::types::{RoleName, SourceId};

/// Error type for schema inference, report retrieval, IO, and output failures.
///
/// Every variant is fatal to a run. Malformed numeric fields are not errors:
/// they are read as zero and reported through a `debug` trace event.
#[derive(Debug, Error)]
pub enum CaseCountError {
    #[error(
        "report '{source_id}' header is missing column roles {missing:?} (found {found:?})"
    )]
    SchemaMapping {
        source_id: SourceId,
        found: Vec<RoleName>,
        missing: Vec<RoleName>,
    },
    #[error("error fetching '{source_id}': {reason}")]
    Fetch { source_id: SourceId, reason: String },
    #[error("unsupported output format '{0}' (expected one of: bulk, csv, json)")]
    UnsupportedFormat(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
