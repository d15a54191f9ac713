//! Pipeline orchestration.
//!
//! [`run`] drives one ingestion pass end to end: locate the source file,
//! normalize it to CSV, load the typed table, strip the markup column, and
//! publish the Parquet artifact. Stage events and failures are reported to
//! the configured observer. Most embedders call [`crate::handler::handle`]
//! instead, which wraps this in a response envelope.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::columnar;
use crate::error::{IngestError, IngestResult};
use crate::handler::IngestConfig;
use crate::observability::{RunContext, RunEvent, RunObserver, Severity};

use super::convert::convert_to_csv;
use super::load::read_csv_table;
use super::locate::{locate_source, LocatedSource, SourceKind};
use super::markup::strip_markup_column;

/// Options controlling a pipeline run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn RunObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// What one successful run did.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Source file the locator selected.
    pub source_path: PathBuf,
    /// Kind the selection was made under.
    pub source_kind: SourceKind,
    /// CSV actually loaded (equals `source_path` for CSV drops).
    pub csv_path: PathBuf,
    /// Artifact path written.
    pub output_path: PathBuf,
    /// Rows in the published table.
    pub rows: usize,
    /// Columns in the published table.
    pub columns: usize,
    /// Cells handed to the markup parser (`None` without an `html_content` column).
    pub markup_cells: Option<usize>,
    /// Human-readable warnings to surface in the response.
    pub warnings: Vec<String>,
}

/// Run the pipeline once.
///
/// When an observer is configured, this function reports:
///
/// - `on_event` for each stage reached (see [`RunEvent`])
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
pub fn run(
    config: &IngestConfig,
    ctx: &RunContext,
    options: &IngestOptions,
) -> IngestResult<IngestReport> {
    let result = run_stages(config, ctx, options);

    if let Some(obs) = options.observer.as_ref() {
        if let Err(e) = &result {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }

    result
}

fn run_stages(
    config: &IngestConfig,
    ctx: &RunContext,
    options: &IngestOptions,
) -> IngestResult<IngestReport> {
    let emit = |event: RunEvent| {
        if let Some(obs) = options.observer.as_ref() {
            obs.on_event(ctx, &event);
        }
    };

    emit(RunEvent::RunStarted);

    let LocatedSource {
        path: source_path,
        kind,
        ignored,
    } = locate_source(&config.ingestion_dir)?;
    emit(RunEvent::SourceLocated {
        path: source_path.clone(),
        kind,
    });

    let mut warnings = Vec::new();
    if !ignored.is_empty() {
        emit(RunEvent::CandidatesIgnored {
            paths: ignored.clone(),
        });
        warnings.push(ignored_warning(kind, &source_path, &ignored));
    }

    let csv_path = convert_to_csv(&source_path, kind)?;
    if csv_path != source_path {
        emit(RunEvent::SourceConverted {
            source: source_path.clone(),
            csv: csv_path.clone(),
        });
    }

    let mut table = read_csv_table(&csv_path)?;
    emit(RunEvent::TableLoaded {
        rows: table.row_count(),
        columns: table.column_count(),
    });

    let markup_cells = strip_markup_column(&mut table)?;
    if let Some(cells) = markup_cells {
        emit(RunEvent::MarkupStripped { cells });
    }

    columnar::write_parquet(&table, &config.output_path)?;
    emit(RunEvent::ArtifactWritten {
        path: config.output_path.clone(),
        rows: table.row_count(),
    });

    Ok(IngestReport {
        source_path,
        source_kind: kind,
        csv_path,
        output_path: config.output_path.clone(),
        rows: table.row_count(),
        columns: table.column_count(),
        markup_cells,
        warnings,
    })
}

fn ignored_warning(kind: SourceKind, selected: &Path, ignored: &[PathBuf]) -> String {
    let ignored_names: Vec<&str> = ignored
        .iter()
        .filter_map(|p| p.file_name()?.to_str())
        .collect();
    format!(
        "multiple {kind:?} candidates in the ingestion directory; selected '{}', ignored: {}",
        selected
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?"),
        ignored_names.join(", ")
    )
}

fn severity_for_error(e: &IngestError) -> Severity {
    match e {
        IngestError::Io(_) => Severity::Critical,
        IngestError::NoSourceFile { .. } => Severity::Critical,
        IngestError::Parquet(err) => {
            // Best-effort: parquet errors often wrap IO, but not always in a structured way.
            // If we can detect IO in the source chain, treat it as Critical.
            if error_chain_contains_io(err) {
                Severity::Critical
            } else {
                Severity::Error
            }
        }
        IngestError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        IngestError::Json(err) => {
            if matches!(err.classify(), serde_json::error::Category::Io) {
                Severity::Critical
            } else {
                Severity::Error
            }
        }
        #[cfg(feature = "excel")]
        IngestError::Excel(_) => Severity::Error,
        IngestError::ExcelDisabled => Severity::Error,
        IngestError::NotTabular { .. } => Severity::Error,
        IngestError::Markup { .. } => Severity::Error,
        IngestError::Encode { .. } => Severity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}
