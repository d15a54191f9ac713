use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestError;
use crate::ingestion::locate::SourceKind;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (run failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about the run, passed to every observer callback.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Job name from the request payload.
    pub scraper_name: String,
    /// Run identifier from the request payload.
    pub run_scraper_id: String,
    /// Directory being ingested.
    pub ingestion_dir: PathBuf,
}

/// Stage events emitted by the pipeline, in run order.
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted,
    SourceLocated { path: PathBuf, kind: SourceKind },
    CandidatesIgnored { paths: Vec<PathBuf> },
    SourceConverted { source: PathBuf, csv: PathBuf },
    TableLoaded { rows: usize, columns: usize },
    MarkupStripped { cells: usize },
    ArtifactWritten { path: PathBuf, rows: usize },
}

/// Observer interface for pipeline runs.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait RunObserver: Send + Sync {
    /// Called as the pipeline moves through its stages.
    fn on_event(&self, _ctx: &RunContext, _event: &RunEvent) {}

    /// Called when the run fails.
    fn on_failure(&self, _ctx: &RunContext, _severity: Severity, _error: &IngestError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &RunContext, severity: Severity, error: &IngestError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn RunObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn RunObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl RunObserver for CompositeObserver {
    fn on_event(&self, ctx: &RunContext, event: &RunEvent) {
        for o in &self.observers {
            o.on_event(ctx, event);
        }
    }

    fn on_failure(&self, ctx: &RunContext, severity: Severity, error: &IngestError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &RunContext, severity: Severity, error: &IngestError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs run progress to stdout, one line per stage.
#[derive(Debug, Default)]
pub struct StdOutObserver;

impl RunObserver for StdOutObserver {
    fn on_event(&self, ctx: &RunContext, event: &RunEvent) {
        match event {
            RunEvent::RunStarted => println!(
                "[ingest][run] scraper={} run_id={} dir={}",
                ctx.scraper_name,
                ctx.run_scraper_id,
                ctx.ingestion_dir.display()
            ),
            RunEvent::SourceLocated { path, kind } => {
                println!("[ingest][source] kind={kind:?} path={}", path.display())
            }
            RunEvent::CandidatesIgnored { paths } => println!(
                "[ingest][skip] ignored={}",
                join_paths(paths)
            ),
            RunEvent::SourceConverted { source, csv } => println!(
                "[ingest][convert] from={} to={}",
                source.display(),
                csv.display()
            ),
            RunEvent::TableLoaded { rows, columns } => {
                println!("[ingest][table] rows={rows} columns={columns}")
            }
            RunEvent::MarkupStripped { cells } => {
                println!("[ingest][markup] cells={cells}")
            }
            RunEvent::ArtifactWritten { path, rows } => {
                println!("[ingest][ok] path={} rows={}", path.display(), rows)
            }
        }
    }

    fn on_failure(&self, ctx: &RunContext, severity: Severity, error: &IngestError) {
        println!(
            "[ingest][{severity:?}] scraper={} run_id={} err={error}",
            ctx.scraper_name, ctx.run_scraper_id
        );
    }

    fn on_alert(&self, ctx: &RunContext, severity: Severity, error: &IngestError) {
        println!(
            "[ALERT][ingest][{severity:?}] scraper={} run_id={} err={error}",
            ctx.scraper_name, ctx.run_scraper_id
        );
    }
}

/// Appends run events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl RunObserver for FileObserver {
    fn on_event(&self, ctx: &RunContext, event: &RunEvent) {
        self.append_line(&format!(
            "{} scraper={} run_id={} event={event:?}",
            unix_ts(),
            ctx.scraper_name,
            ctx.run_scraper_id
        ));
    }

    fn on_failure(&self, ctx: &RunContext, severity: Severity, error: &IngestError) {
        self.append_line(&format!(
            "{} fail severity={severity:?} scraper={} run_id={} err={error}",
            unix_ts(),
            ctx.scraper_name,
            ctx.run_scraper_id
        ));
    }

    fn on_alert(&self, ctx: &RunContext, severity: Severity, error: &IngestError) {
        self.append_line(&format!(
            "{} ALERT severity={severity:?} scraper={} run_id={} err={error}",
            unix_ts(),
            ctx.scraper_name,
            ctx.run_scraper_id
        ));
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
