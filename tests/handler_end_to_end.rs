use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;

use employee_ingest::handler::{handle, IngestConfig, IngestRequest};
use employee_ingest::ingestion::IngestOptions;

fn tmp_base(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let base = std::env::temp_dir().join(format!("employee-ingest-handler-{tag}-{nanos}"));
    fs::create_dir_all(base.join("ingestion")).unwrap();
    base
}

fn parquet_row_count(path: &Path) -> i64 {
    let reader = SerializedFileReader::try_from(path).unwrap();
    reader.metadata().file_metadata().num_rows()
}

#[test]
fn json_drop_runs_end_to_end() {
    let base = tmp_base("json");
    let ingestion = base.join("ingestion");
    fs::write(ingestion.join("data.json"), r#"[{"id":1,"name":"Ann"}]"#).unwrap();

    let config = IngestConfig::from_base_dir(&base);
    let response = handle(&config, &IngestRequest::default(), &IngestOptions::default());

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.body,
        format!("Parquet file generated at {}", config.output_path.display())
    );
    assert!(response.warnings.is_empty());

    let derived = fs::read_to_string(ingestion.join("data.csv")).unwrap();
    assert_eq!(derived, "id,name\n1,Ann\n");
    assert_eq!(parquet_row_count(&config.output_path), 1);

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn csv_drop_skips_conversion() {
    let base = tmp_base("csv");
    let ingestion = base.join("ingestion");
    fs::write(ingestion.join("employees.csv"), "id,name\n1,Ann\n2,Bob\n").unwrap();

    let config = IngestConfig::from_base_dir(&base);
    let response = handle(&config, &IngestRequest::default(), &IngestOptions::default());

    assert_eq!(response.status_code, 200);
    assert_eq!(parquet_row_count(&config.output_path), 2);

    let mut names: Vec<String> = fs::read_dir(&ingestion)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["employee_data.parquet", "employees.csv"]);

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn empty_directory_is_a_404() {
    let base = tmp_base("empty");

    let config = IngestConfig::from_base_dir(&base);
    let response = handle(&config, &IngestRequest::default(), &IngestOptions::default());

    assert_eq!(response.status_code, 404);
    assert!(response.body.contains("no csv, xlsx, or json source file"));

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn malformed_json_is_a_422() {
    let base = tmp_base("malformed");
    fs::write(base.join("ingestion").join("data.json"), "{nope").unwrap();

    let config = IngestConfig::from_base_dir(&base);
    let response = handle(&config, &IngestRequest::default(), &IngestOptions::default());

    assert_eq!(response.status_code, 422);
    assert!(response.body.starts_with("ingestion failed:"));

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn competing_candidates_surface_a_warning() {
    let base = tmp_base("warning");
    let ingestion = base.join("ingestion");
    fs::write(ingestion.join("a.csv"), "id\n1\n").unwrap();
    fs::write(ingestion.join("b.csv"), "id\n1\n2\n").unwrap();

    let config = IngestConfig::from_base_dir(&base);
    let response = handle(&config, &IngestRequest::default(), &IngestOptions::default());

    assert_eq!(response.status_code, 200);
    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].contains("a.csv"));
    assert!(response.warnings[0].contains("b.csv"));

    // a.csv sorts first and carries one row.
    assert_eq!(parquet_row_count(&config.output_path), 1);

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn second_run_overwrites_and_ignores_the_artifact() {
    let base = tmp_base("rerun");
    fs::write(base.join("ingestion").join("data.csv"), "id\n1\n2\n3\n").unwrap();

    let config = IngestConfig::from_base_dir(&base);
    let first = handle(&config, &IngestRequest::default(), &IngestOptions::default());
    assert_eq!(first.status_code, 200);
    assert_eq!(parquet_row_count(&config.output_path), 3);

    let second = handle(&config, &IngestRequest::default(), &IngestOptions::default());
    assert_eq!(second.status_code, 200);
    assert!(second.warnings.is_empty());
    assert_eq!(parquet_row_count(&config.output_path), 3);

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn scraper_event_payload_deserializes_and_runs() {
    let base = tmp_base("event");
    fs::write(base.join("ingestion").join("data.csv"), "id\n1\n").unwrap();

    let request: IngestRequest = serde_json::from_str(
        r#"{"scraper_input":{"scraper_name":"csv_100","run_scraper_id":"100"}}"#,
    )
    .unwrap();
    assert_eq!(request.scraper_input.scraper_name, "csv_100");
    assert_eq!(request.scraper_input.run_scraper_id, "100");

    let config = IngestConfig::from_base_dir(&base);
    let response = handle(&config, &request, &IngestOptions::default());
    assert_eq!(response.status_code, 200);

    let _ = fs::remove_dir_all(&base);
}

#[cfg(feature = "excel")]
#[test]
fn xlsx_drop_runs_end_to_end() {
    use rust_xlsxwriter::Workbook;

    let base = tmp_base("xlsx");
    let ingestion = base.join("ingestion");
    let source = ingestion.join("report.xlsx");

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    ws.write_number(1, 0, 1).unwrap();
    ws.write_string(1, 1, "Ada").unwrap();
    wb.save(&source).unwrap();

    let config = IngestConfig::from_base_dir(&base);
    let response = handle(&config, &IngestRequest::default(), &IngestOptions::default());

    assert_eq!(response.status_code, 200);
    assert!(ingestion.join("report.csv").is_file());
    assert_eq!(parquet_row_count(&config.output_path), 1);

    let _ = fs::remove_dir_all(&base);
}
