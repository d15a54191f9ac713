//! Format conversion to CSV.
//!
//! The loader works on CSV; [`convert_to_csv`] turns a located spreadsheet or
//! JSON source into a CSV sibling (same file stem, `.csv` extension) and
//! leaves it on disk next to the source. CSV sources pass through untouched.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, IngestResult};

use super::locate::SourceKind;

/// Sibling path with the extension replaced by `.csv`.
pub fn csv_sibling_path(path: &Path) -> PathBuf {
    path.with_extension("csv")
}

/// Normalize a located source to CSV, returning the path to load.
///
/// CSV sources come back unchanged with no side effect. Spreadsheet and JSON
/// sources are converted and written to [`csv_sibling_path`] on disk.
pub fn convert_to_csv(path: &Path, kind: SourceKind) -> IngestResult<PathBuf> {
    match kind {
        SourceKind::Csv => Ok(path.to_path_buf()),
        SourceKind::Spreadsheet => spreadsheet_dispatch(path),
        SourceKind::Json => json_to_csv(path),
    }
}

fn spreadsheet_dispatch(path: &Path) -> IngestResult<PathBuf> {
    // Avoid unused warnings when the feature is off.
    let _ = path;

    #[cfg(feature = "excel")]
    {
        super::spreadsheet::spreadsheet_to_csv(path)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestError::ExcelDisabled)
    }
}

/// Convert a JSON document to a CSV sibling.
///
/// Accepted shapes: an array of objects (one row per object) or a single
/// object (one row). Columns are the union of record keys in document order
/// (first seen wins across records); a record missing a key yields an empty
/// cell. Scalar cells render as their JSON text (null renders empty); nested
/// arrays/objects render as compact JSON.
pub fn json_to_csv(path: &Path) -> IngestResult<PathBuf> {
    let text = fs::read_to_string(path)?;
    let doc: serde_json::Value = serde_json::from_str(&text)?;

    let records: Vec<serde_json::Map<String, serde_json::Value>> = match doc {
        serde_json::Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for (idx0, item) in items.into_iter().enumerate() {
                match item {
                    serde_json::Value::Object(map) => records.push(map),
                    other => {
                        return Err(IngestError::NotTabular {
                            message: format!(
                                "json record {} is not an object (got {})",
                                idx0 + 1,
                                json_type_name(&other)
                            ),
                        });
                    }
                }
            }
            records
        }
        serde_json::Value::Object(map) => vec![map],
        other => {
            return Err(IngestError::NotTabular {
                message: format!(
                    "json document must be an object or an array of objects (got {})",
                    json_type_name(&other)
                ),
            });
        }
    };
    if records.is_empty() {
        return Err(IngestError::NotTabular {
            message: "json document holds no records".to_string(),
        });
    }

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    if columns.is_empty() {
        return Err(IngestError::NotTabular {
            message: "json records have no keys".to_string(),
        });
    }

    let out = csv_sibling_path(path);
    let mut writer = csv::Writer::from_path(&out)?;
    writer.write_record(&columns)?;
    for record in &records {
        let row: Vec<String> = columns
            .iter()
            .map(|c| record.get(c).map(json_cell_to_string).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(out)
}

fn json_cell_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
