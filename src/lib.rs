//! `employee-ingest` publishes the data file dropped in an ingestion
//! directory as a Parquet artifact.
//!
//! One invocation of [`handler::handle`] runs the full pipeline:
//!
//! 1. **Locate** the source file among the directory's immediate entries
//!    (`.csv`, `.xlsx`, `.json`; CSV wins over spreadsheets, spreadsheets
//!    over JSON; within a kind the lexicographically first file name wins
//!    and the rest are surfaced as a response warning).
//! 2. **Normalize** spreadsheet and JSON sources to a CSV sibling on disk
//!    (spreadsheets need the `excel` feature, on by default).
//! 3. **Load** the CSV into a typed [`types::Table`]: bytes decode as
//!    ISO-8859-1, column types are inferred (int64, else float64, else
//!    bool, else text), empty cells become [`types::Value::Null`].
//! 4. **Strip markup**: when an `html_content` column exists, every cell is
//!    replaced by its extracted plain text (nulls become empty strings).
//! 5. **Publish** the table as Parquet (one OPTIONAL column per field, no
//!    row index column), overwriting the previous artifact.
//!
//! Failures never escape the handler: they come back as a response envelope
//! whose status code classifies them (see [`handler::IngestResponse`]).
//!
//! ## Quick example
//!
//! ```no_run
//! use employee_ingest::handler::{handle, IngestConfig, IngestRequest};
//! use employee_ingest::ingestion::IngestOptions;
//!
//! let config = IngestConfig::from_base_dir("/var/task");
//! let request = IngestRequest::default();
//! let response = handle(&config, &request, &IngestOptions::default());
//! println!("{} {}", response.status_code, response.body);
//! ```
//!
//! ## Observability (stdout logging + alert threshold)
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use employee_ingest::handler::{handle, IngestConfig, IngestRequest};
//! use employee_ingest::ingestion::IngestOptions;
//! use employee_ingest::observability::StdOutObserver;
//!
//! let config = IngestConfig::new("drops", "drops/employee_data.parquet");
//! let options = IngestOptions {
//!     observer: Some(Arc::new(StdOutObserver::default())),
//!     ..Default::default()
//! };
//! let response = handle(&config, &IngestRequest::default(), &options);
//! println!("{}", response.body);
//! ```
//!
//! ## Stage-level use
//!
//! The stages are public for embedders that need only part of the flow:
//!
//! ```no_run
//! use employee_ingest::columnar::write_parquet;
//! use employee_ingest::ingestion::{convert_to_csv, load_table, locate_source};
//!
//! # fn main() -> Result<(), employee_ingest::IngestError> {
//! let located = locate_source("drops")?;
//! let csv_path = convert_to_csv(&located.path, located.kind)?;
//! let table = load_table(&csv_path)?;
//! write_parquet(&table, "drops/employee_data.parquet")?;
//! println!("rows={}", table.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`handler`]: request/response envelope and path configuration
//! - [`ingestion`]: locate, convert, load, markup, pipeline
//! - [`columnar`]: Parquet publication
//! - [`observability`]: run observers (stdout, file, composite)
//! - [`types`]: schema + in-memory table types
//! - [`error`]: error type used across the pipeline

pub mod columnar;
pub mod error;
pub mod handler;
pub mod ingestion;
pub mod observability;
pub mod types;

pub use error::{IngestError, IngestResult};
