//! Run the ingestion handler locally against a base directory.
//!
//! Usage: `local_run [BASE_DIR] [EVENT_JSON_FILE]`
//!
//! `BASE_DIR` defaults to the current directory; the handler scans
//! `BASE_DIR/ingestion` and publishes `BASE_DIR/ingestion/employee_data.parquet`.
//! The optional event file holds an `IngestRequest` payload; without one a
//! canned local test event is used.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use employee_ingest::handler::{handle, IngestConfig, IngestRequest, ScraperInput};
use employee_ingest::ingestion::IngestOptions;
use employee_ingest::observability::StdOutObserver;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let base = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let event_path = args.next().map(PathBuf::from);

    let request = match event_path {
        Some(path) => match read_event(&path) {
            Ok(request) => request,
            Err(message) => {
                eprintln!("cannot read event file '{}': {message}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => IngestRequest {
            scraper_input: ScraperInput {
                scraper_name: "csv_100".to_string(),
                run_scraper_id: "100".to_string(),
            },
        },
    };

    let config = IngestConfig::from_base_dir(&base);
    let options = IngestOptions {
        observer: Some(Arc::new(StdOutObserver::default())),
        ..Default::default()
    };

    let response = handle(&config, &request, &options);
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(_) => println!("{response:?}"),
    }

    if response.status_code == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn read_event(path: &Path) -> Result<IngestRequest, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}
