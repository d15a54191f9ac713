//! Request/response envelope.
//!
//! [`handle`] is the embedding surface: it takes explicit paths
//! ([`IngestConfig`]), the invocation payload ([`IngestRequest`]), runs the
//! pipeline, and always returns an [`IngestResponse`]. Typed errors are
//! translated into a status code and message, never propagated raw.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::ingestion::pipeline::{self, IngestOptions};
use crate::observability::RunContext;

/// File name of the published artifact under the default layout.
pub const OUTPUT_FILE_NAME: &str = "employee_data.parquet";

/// Where to read candidates from and where to publish the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Directory scanned for source files.
    pub ingestion_dir: PathBuf,
    /// Artifact path, overwritten on every run.
    pub output_path: PathBuf,
}

impl IngestConfig {
    /// Create a config with explicit paths.
    pub fn new(ingestion_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            ingestion_dir: ingestion_dir.into(),
            output_path: output_path.into(),
        }
    }

    /// Deployment layout: `<base>/ingestion` holds the drops and the
    /// artifact is published as [`OUTPUT_FILE_NAME`] in the same directory.
    pub fn from_base_dir(base: impl AsRef<Path>) -> Self {
        let ingestion_dir = base.as_ref().join("ingestion");
        let output_path = ingestion_dir.join(OUTPUT_FILE_NAME);
        Self {
            ingestion_dir,
            output_path,
        }
    }
}

/// Metadata identifying the scraper run that produced the drop.
///
/// Used only for logging/traceability; never affects pipeline behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScraperInput {
    /// Job name; defaults to `unknown_scraper`.
    #[serde(default = "ScraperInput::default_name")]
    pub scraper_name: String,
    /// Run identifier; defaults to `000`.
    #[serde(default = "ScraperInput::default_run_id")]
    pub run_scraper_id: String,
}

impl ScraperInput {
    fn default_name() -> String {
        "unknown_scraper".to_string()
    }

    fn default_run_id() -> String {
        "000".to_string()
    }
}

impl Default for ScraperInput {
    fn default() -> Self {
        Self {
            scraper_name: Self::default_name(),
            run_scraper_id: Self::default_run_id(),
        }
    }
}

/// Invocation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IngestRequest {
    /// Scraper metadata; the whole block and each field are optional.
    #[serde(default)]
    pub scraper_input: ScraperInput,
}

/// Invocation result envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestResponse {
    /// HTTP-style status code (200 on success).
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Success message or failure description.
    pub body: String,
    /// Non-fatal findings (e.g. ignored extra candidates). Omitted from the
    /// serialized form when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Run the pipeline and translate the outcome into a response envelope.
///
/// Never returns an error: failures come back as an [`IngestResponse`] whose
/// status code classifies them (404 nothing to ingest, 422 the source could
/// not be parsed, 500 infrastructure, 501 spreadsheet support compiled out).
pub fn handle(
    config: &IngestConfig,
    request: &IngestRequest,
    options: &IngestOptions,
) -> IngestResponse {
    let ctx = RunContext {
        scraper_name: request.scraper_input.scraper_name.clone(),
        run_scraper_id: request.scraper_input.run_scraper_id.clone(),
        ingestion_dir: config.ingestion_dir.clone(),
    };

    match pipeline::run(config, &ctx, options) {
        Ok(report) => IngestResponse {
            status_code: 200,
            body: format!("Parquet file generated at {}", report.output_path.display()),
            warnings: report.warnings,
        },
        Err(e) => IngestResponse {
            status_code: status_code_for_error(&e),
            body: format!("ingestion failed: {e}"),
            warnings: Vec::new(),
        },
    }
}

fn status_code_for_error(e: &IngestError) -> u16 {
    match e {
        IngestError::NoSourceFile { .. } => 404,
        IngestError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => 500,
            _ => 422,
        },
        IngestError::Json(err) => {
            if matches!(err.classify(), serde_json::error::Category::Io) {
                500
            } else {
                422
            }
        }
        #[cfg(feature = "excel")]
        IngestError::Excel(_) => 422,
        IngestError::NotTabular { .. } | IngestError::Markup { .. } => 422,
        IngestError::ExcelDisabled => 501,
        IngestError::Io(_) | IngestError::Parquet(_) | IngestError::Encode { .. } => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_apply_to_empty_payload() {
        let request: IngestRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.scraper_input.scraper_name, "unknown_scraper");
        assert_eq!(request.scraper_input.run_scraper_id, "000");
    }

    #[test]
    fn request_defaults_apply_per_field() {
        let request: IngestRequest =
            serde_json::from_str(r#"{"scraper_input":{"scraper_name":"csv_100"}}"#).unwrap();
        assert_eq!(request.scraper_input.scraper_name, "csv_100");
        assert_eq!(request.scraper_input.run_scraper_id, "000");
    }

    #[test]
    fn response_uses_external_key_names() {
        let response = IngestResponse {
            status_code: 200,
            body: "ok".to_string(),
            warnings: Vec::new(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"statusCode":200,"body":"ok"}"#);
    }

    #[test]
    fn warnings_serialize_when_present() {
        let response = IngestResponse {
            status_code: 200,
            body: "ok".to_string(),
            warnings: vec!["extra candidate".to_string()],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""warnings":["extra candidate"]"#));
    }

    #[test]
    fn status_codes_classify_errors() {
        let not_found = IngestError::NoSourceFile {
            dir: PathBuf::from("/tmp/empty"),
        };
        assert_eq!(status_code_for_error(&not_found), 404);

        let markup = IngestError::Markup {
            row: 2,
            column: "html_content".to_string(),
            message: "expected markup text".to_string(),
        };
        assert_eq!(status_code_for_error(&markup), 422);

        let not_tabular = IngestError::NotTabular {
            message: "bare scalar".to_string(),
        };
        assert_eq!(status_code_for_error(&not_tabular), 422);

        let io = IngestError::Io(std::io::Error::other("disk gone"));
        assert_eq!(status_code_for_error(&io), 500);

        assert_eq!(status_code_for_error(&IngestError::ExcelDisabled), 501);
    }

    #[test]
    fn config_from_base_dir_matches_deployment_layout() {
        let config = IngestConfig::from_base_dir("/var/task");
        assert_eq!(config.ingestion_dir, PathBuf::from("/var/task/ingestion"));
        assert_eq!(
            config.output_path,
            PathBuf::from("/var/task/ingestion/employee_data.parquet")
        );
    }
}
