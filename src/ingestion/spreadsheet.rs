#![cfg(feature = "excel")]

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{IngestError, IngestResult};

use super::convert::csv_sibling_path;

/// Convert the first sheet of a workbook to a CSV sibling.
///
/// Behavior:
/// - Opens the workbook and takes the first sheet
/// - Detects the first non-empty row as the header row
/// - Writes the header row and everything below it as rendered text
///
/// The loader re-infers cell types from the rendered text, same as for a
/// native CSV drop.
pub fn spreadsheet_to_csv(path: impl AsRef<Path>) -> IngestResult<PathBuf> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::NotTabular {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&sheet)?;

    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| IngestError::NotTabular {
            message: format!("sheet '{sheet}' has no non-empty rows"),
        })?;

    let out = csv_sibling_path(path);
    let mut writer = csv::Writer::from_path(&out)?;
    for row in range.rows().skip(header_row_idx) {
        let record: Vec<String> = row.iter().map(cell_to_csv_string).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(out)
}

fn cell_to_csv_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // `i64::MAX as f64` rounds up to 2^63, so `<` keeps the cast exact.
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
