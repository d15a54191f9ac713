//! Ingestion stages and the pipeline that drives them.
//!
//! Most callers go through [`crate::handler::handle`]; [`pipeline::run`] is
//! the typed core underneath it. The individual stages are public for
//! embedders that need only part of the flow:
//!
//! - [`locate`]: select the source file from the ingestion directory
//! - [`convert`]: normalize spreadsheet/JSON sources to a CSV sibling
//! - [`load`]: CSV into a typed [`crate::types::Table`] (ISO-8859-1 decode, type inference)
//! - [`markup`]: strip the `html_content` column to plain text
//! - [`pipeline`]: orchestration, options, observer reporting

pub mod convert;
pub mod load;
pub mod locate;
pub mod markup;
pub mod pipeline;
#[cfg(feature = "excel")]
pub mod spreadsheet;

pub use convert::{convert_to_csv, csv_sibling_path, json_to_csv};
pub use load::{load_table, read_csv_table, read_csv_table_from_reader};
pub use locate::{locate_source, LocatedSource, SourceKind};
pub use markup::{markup_to_text, strip_markup_column, MARKUP_COLUMN};
pub use pipeline::{run, IngestOptions, IngestReport};
#[cfg(feature = "excel")]
pub use spreadsheet::spreadsheet_to_csv;
