use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field as ParquetField;

use employee_ingest::columnar::write_parquet;
use employee_ingest::types::{DataType, Field, Schema, Table, Value};
use employee_ingest::IngestError;

fn tmp_parquet(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("employee-ingest-columnar-{tag}-{nanos}.parquet"))
}

fn people_table() -> Table {
    Table::new(
        Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
            Field::new("active", DataType::Bool),
        ]),
        vec![
            vec![
                Value::Int64(1),
                Value::Utf8("Ada".to_string()),
                Value::Float64(98.5),
                Value::Bool(true),
            ],
            vec![
                Value::Int64(2),
                Value::Null,
                Value::Float64(87.25),
                Value::Bool(false),
            ],
            vec![
                Value::Null,
                Value::Utf8("Grace".to_string()),
                Value::Null,
                Value::Null,
            ],
        ],
    )
}

fn read_rows(path: &PathBuf) -> Vec<Vec<(String, ParquetField)>> {
    let reader = SerializedFileReader::try_from(path.as_path()).unwrap();
    reader
        .into_iter()
        .map(|row| {
            row.unwrap()
                .get_column_iter()
                .map(|(name, field)| (name.clone(), field.clone()))
                .collect()
        })
        .collect()
}

#[test]
fn roundtrip_preserves_values_and_nulls() {
    let path = tmp_parquet("roundtrip");
    write_parquet(&people_table(), &path).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0][0], ("id".to_string(), ParquetField::Long(1)));
    assert_eq!(
        rows[0][1],
        ("name".to_string(), ParquetField::Str("Ada".to_string()))
    );
    assert_eq!(rows[0][2].1, ParquetField::Double(98.5));
    assert_eq!(rows[0][3].1, ParquetField::Bool(true));

    assert_eq!(rows[1][1].1, ParquetField::Null);
    assert_eq!(rows[2][0].1, ParquetField::Null);
    assert_eq!(rows[2][2].1, ParquetField::Null);
    assert_eq!(rows[2][3].1, ParquetField::Null);

    let _ = fs::remove_file(&path);
}

#[test]
fn rewriting_replaces_the_previous_artifact() {
    let path = tmp_parquet("overwrite");
    write_parquet(&people_table(), &path).unwrap();

    let single = Table::new(
        Schema::new(vec![Field::new("id", DataType::Int64)]),
        vec![vec![Value::Int64(9)]],
    );
    write_parquet(&single, &path).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], ("id".to_string(), ParquetField::Long(9)));

    let _ = fs::remove_file(&path);
}

#[test]
fn empty_table_writes_schema_and_no_rows() {
    let path = tmp_parquet("empty");
    let table = Table::new(
        Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
        ]),
        vec![],
    );
    write_parquet(&table, &path).unwrap();

    let reader = SerializedFileReader::try_from(path.as_path()).unwrap();
    let meta = reader.metadata().file_metadata();
    assert_eq!(meta.num_rows(), 0);

    let columns: Vec<String> = meta
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect();
    assert_eq!(columns, ["id", "name"]);

    let _ = fs::remove_file(&path);
}

#[test]
fn mismatched_cell_is_an_encode_error() {
    let path = tmp_parquet("mismatch");
    let lying = Table::new(
        Schema::new(vec![Field::new("id", DataType::Int64)]),
        vec![vec![Value::Utf8("not a number".to_string())]],
    );

    let err = write_parquet(&lying, &path).unwrap_err();
    match err {
        IngestError::Encode {
            column,
            row,
            expected,
            found,
        } => {
            assert_eq!(column, "id");
            assert_eq!(row, 1);
            assert_eq!(expected, "int64");
            assert_eq!(found, "utf8");
        }
        other => panic!("expected an encode error, got {other:?}"),
    }

    let _ = fs::remove_file(&path);
}
