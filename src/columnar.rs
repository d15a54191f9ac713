//! Parquet publication.
//!
//! [`write_parquet`] serializes a [`Table`] to a Parquet file: one OPTIONAL
//! column per field, a single row group, no row index column. An existing
//! file at the target path is overwritten.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::basic::{LogicalType, Repetition, Type as PhysicalType};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;

use crate::error::{IngestError, IngestResult};
use crate::types::{DataType, Field, Table, Value};

/// Serialize `table` to a Parquet file at `path`, overwriting any existing file.
///
/// Every column is written OPTIONAL so [`Value::Null`] cells survive the
/// round trip. Type mapping: Int64 -> INT64, Float64 -> DOUBLE, Bool ->
/// BOOLEAN, Utf8 -> BYTE_ARRAY (String).
pub fn write_parquet(table: &Table, path: impl AsRef<Path>) -> IngestResult<()> {
    let schema = parquet_schema(table)?;
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path)?;

    let mut writer = SerializedFileWriter::new(file, schema, props)?;
    let mut row_group = writer.next_row_group()?;
    let mut index = 0usize;
    while let Some(mut column) = row_group.next_column()? {
        write_column(column.untyped(), table, index)?;
        column.close()?;
        index += 1;
    }
    row_group.close()?;
    writer.close()?;
    Ok(())
}

fn parquet_schema(table: &Table) -> IngestResult<Arc<Type>> {
    let mut fields = Vec::with_capacity(table.schema.fields.len());
    for field in &table.schema.fields {
        let builder = match field.data_type {
            DataType::Int64 => Type::primitive_type_builder(&field.name, PhysicalType::INT64),
            DataType::Float64 => Type::primitive_type_builder(&field.name, PhysicalType::DOUBLE),
            DataType::Bool => Type::primitive_type_builder(&field.name, PhysicalType::BOOLEAN),
            DataType::Utf8 => Type::primitive_type_builder(&field.name, PhysicalType::BYTE_ARRAY)
                .with_logical_type(Some(LogicalType::String)),
        };
        fields.push(Arc::new(
            builder.with_repetition(Repetition::OPTIONAL).build()?,
        ));
    }
    Ok(Arc::new(
        Type::group_type_builder("table").with_fields(fields).build()?,
    ))
}

fn write_column(writer: &mut ColumnWriter<'_>, table: &Table, index: usize) -> IngestResult<()> {
    let field = &table.schema.fields[index];
    // Definition level 1 marks a present cell, 0 a null; values below carry
    // only the present cells.
    let def_levels: Vec<i16> = table
        .column(index)
        .map(|v| i16::from(!v.is_null()))
        .collect();

    match writer {
        ColumnWriter::Int64ColumnWriter(w) => {
            let mut values = Vec::new();
            for (row_idx0, value) in table.column(index).enumerate() {
                match value {
                    Value::Int64(v) => values.push(*v),
                    Value::Null => {}
                    other => return Err(encode_error(field, row_idx0, other)),
                }
            }
            w.write_batch(&values, Some(&def_levels), None)?;
        }
        ColumnWriter::DoubleColumnWriter(w) => {
            let mut values = Vec::new();
            for (row_idx0, value) in table.column(index).enumerate() {
                match value {
                    Value::Float64(v) => values.push(*v),
                    Value::Null => {}
                    other => return Err(encode_error(field, row_idx0, other)),
                }
            }
            w.write_batch(&values, Some(&def_levels), None)?;
        }
        ColumnWriter::BoolColumnWriter(w) => {
            let mut values = Vec::new();
            for (row_idx0, value) in table.column(index).enumerate() {
                match value {
                    Value::Bool(v) => values.push(*v),
                    Value::Null => {}
                    other => return Err(encode_error(field, row_idx0, other)),
                }
            }
            w.write_batch(&values, Some(&def_levels), None)?;
        }
        ColumnWriter::ByteArrayColumnWriter(w) => {
            let mut values = Vec::new();
            for (row_idx0, value) in table.column(index).enumerate() {
                match value {
                    Value::Utf8(v) => values.push(ByteArray::from(v.as_str())),
                    Value::Null => {}
                    other => return Err(encode_error(field, row_idx0, other)),
                }
            }
            w.write_batch(&values, Some(&def_levels), None)?;
        }
        _ => {
            return Err(ParquetError::General(format!(
                "unsupported column writer for '{}'",
                field.name
            ))
            .into());
        }
    }

    Ok(())
}

fn encode_error(field: &Field, row_idx0: usize, found: &Value) -> IngestError {
    IngestError::Encode {
        column: field.name.clone(),
        row: row_idx0 + 1,
        expected: field.data_type.name(),
        found: found.type_name(),
    }
}
