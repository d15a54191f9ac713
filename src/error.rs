use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error type returned by the ingestion pipeline.
///
/// A single error enum shared across source location, format conversion
/// (JSON and optional Excel), table loading, and Parquet publication. The
/// handler maps each variant onto a response status code; see [`crate::handler`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// Underlying I/O error (e.g. unreadable directory, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No `.csv`, `.xlsx`, or `.json` file in the ingestion directory.
    #[error("no csv, xlsx, or json source file in '{}'", dir.display())]
    NoSourceFile { dir: PathBuf },

    #[cfg(feature = "excel")]
    /// Spreadsheet conversion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// A spreadsheet candidate was selected but the crate was built without
    /// the `excel` feature.
    #[error("spreadsheet conversion requires the 'excel' feature")]
    ExcelDisabled,

    /// CSV read or write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The parsed document is not a table (e.g. a bare JSON scalar, or a
    /// workbook with no sheets).
    #[error("input is not tabular: {message}")]
    NotTabular { message: String },

    /// A markup cell could not be handed to the text extractor.
    #[error("markup extraction failed at row {row} column '{column}': {message}")]
    Markup {
        row: usize,
        column: String,
        message: String,
    },

    /// Parquet write error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A cell's value does not match its column's declared type, so it cannot
    /// be encoded into the columnar output.
    #[error("cannot encode column '{column}' at row {row}: expected {expected}, found {found}")]
    Encode {
        column: String,
        row: usize,
        expected: &'static str,
        found: &'static str,
    },
}
