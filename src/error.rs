//! Error types for scanning, probing and report rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read the duration of a single media file.
///
/// These never abort a scan; the caller records a missing duration instead.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to run {program} on {path}: {source}")]
    Spawn {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ffprobe rejected {path}: {reason}")]
    Rejected { path: PathBuf, reason: String },

    #[error("Unreadable ffprobe output for {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No usable duration reported for {path}")]
    MissingDuration { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Root path {0} is not a directory")]
    RootNotDirectory(PathBuf),

    #[error("Cannot resolve path {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// Cells that were about to be merged do not hold the same value.
    #[error("Values in column '{column}' from row {first_row} to {last_row} are not uniform")]
    NonUniform {
        column: &'static str,
        first_row: u32,
        last_row: u32,
    },

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Anything that stops a run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
