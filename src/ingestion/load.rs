//! CSV loading with type inference.
//!
//! The loader decodes CSV bytes as ISO-8859-1 unconditionally (the upstream
//! feeds are legacy exports); UTF-8 input therefore round-trips multi-byte
//! sequences as several characters, which is a documented tradeoff rather
//! than a bug. Column types are inferred per column over the whole file:
//! all non-empty cells parse as i64, else all parse as f64, else all are
//! `true`/`false` (case-insensitive), else text. Empty cells load as
//! [`Value::Null`]; an all-empty column is text.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{IngestError, IngestResult};
use crate::types::{DataType, Field, Schema, Table, Value};

use super::markup;

/// Load a CSV file into a typed [`Table`].
///
/// Bytes are decoded as ISO-8859-1 and column types are inferred (see module
/// docs). When an `html_content` column exists, every cell is replaced by
/// its extracted plain text (see [`super::markup`]).
pub fn load_table(path: impl AsRef<Path>) -> IngestResult<Table> {
    let mut table = read_csv_table(path)?;
    markup::strip_markup_column(&mut table)?;
    Ok(table)
}

/// Load a CSV file into a typed [`Table`] without the markup pass.
pub fn read_csv_table(path: impl AsRef<Path>) -> IngestResult<Table> {
    let bytes = fs::read(path)?;
    let text = encoding_rs::mem::decode_latin1(&bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    read_csv_table_from_reader(&mut rdr)
}

/// Load CSV data from an existing reader over already-decoded text.
pub fn read_csv_table_from_reader<R: io::Read>(rdr: &mut csv::Reader<R>) -> IngestResult<Table> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(IngestError::NotTabular {
            message: "csv input has no header row".to_string(),
        });
    }

    let mut records: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        records.push(result?);
    }

    let fields: Vec<Field> = headers
        .iter()
        .enumerate()
        .map(|(index, name)| Field::new(name, infer_column_type(&records, index)))
        .collect();
    let schema = Schema::new(fields);

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len());
    for record in &records {
        let row: Vec<Value> = schema
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| parse_cell(field.data_type, record.get(index).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(Table::new(schema, rows))
}

fn infer_column_type(records: &[csv::StringRecord], index: usize) -> DataType {
    let mut saw_value = false;
    let mut int_ok = true;
    let mut float_ok = true;
    let mut bool_ok = true;

    for record in records {
        let trimmed = record.get(index).unwrap_or("").trim();
        if trimmed.is_empty() {
            continue;
        }
        saw_value = true;
        if int_ok && trimmed.parse::<i64>().is_err() {
            int_ok = false;
        }
        if float_ok && trimmed.parse::<f64>().is_err() {
            float_ok = false;
        }
        if bool_ok && !is_bool_literal(trimmed) {
            bool_ok = false;
        }
        if !int_ok && !float_ok && !bool_ok {
            return DataType::Utf8;
        }
    }

    if !saw_value {
        DataType::Utf8
    } else if int_ok {
        DataType::Int64
    } else if float_ok {
        DataType::Float64
    } else if bool_ok {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

fn is_bool_literal(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

fn parse_cell(data_type: DataType, raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    match data_type {
        DataType::Utf8 => Value::Utf8(trimmed.to_owned()),
        // Inference already proved every non-empty cell in the column parses
        // under its type, so the text fallbacks below are unreachable.
        DataType::Int64 => match trimmed.parse::<i64>() {
            Ok(v) => Value::Int64(v),
            Err(_) => Value::Utf8(trimmed.to_owned()),
        },
        DataType::Float64 => match trimmed.parse::<f64>() {
            Ok(v) => Value::Float64(v),
            Err(_) => Value::Utf8(trimmed.to_owned()),
        },
        DataType::Bool => Value::Bool(trimmed.eq_ignore_ascii_case("true")),
    }
}
