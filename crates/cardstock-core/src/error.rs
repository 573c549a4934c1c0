//! Error types for cardstock-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cardstock-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV decoding error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// XLSX decoding error from calamine
    #[error("XLSX error in '{path}': {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// Source file with an extension we can't import
    #[error("unsupported source format: '{path}'")]
    UnsupportedFormat { path: PathBuf },

    /// A worksheet doesn't match the layout a converter expects
    #[error("sheet '{sheet}' doesn't match the expected layout: {detail}")]
    SheetLayout { sheet: String, detail: String },

    /// A cell held something non-numeric where a number is required
    #[error("expected a number for '{field}', found '{value}'")]
    NumberParse { field: String, value: String },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
