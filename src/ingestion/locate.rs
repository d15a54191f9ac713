//! Source file location.
//!
//! [`locate_source`] scans the immediate entries of the ingestion directory
//! and selects exactly one candidate file by kind priority.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, IngestResult};

/// Kinds of source file the locator recognizes.
///
/// Discriminant order is the selection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Comma-separated values (`.csv`).
    Csv,
    /// Excel workbook (`.xlsx`).
    Spreadsheet,
    /// JSON document (`.json`).
    Json,
}

impl SourceKind {
    /// Selection priority when a directory holds several kinds.
    pub const PRIORITY: [SourceKind; 3] = [
        SourceKind::Csv,
        SourceKind::Spreadsheet,
        SourceKind::Json,
    ];

    /// Parse a source kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Spreadsheet),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// The locator's pick, plus the same-kind candidates it passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSource {
    /// Selected source file.
    pub path: PathBuf,
    /// Kind the selection was made under.
    pub kind: SourceKind,
    /// Unselected candidates of the same kind, in lexicographic order.
    pub ignored: Vec<PathBuf>,
}

/// Select the source file to ingest from the immediate entries of `dir`.
///
/// Candidates are classified by extension only; anything unrecognized is
/// skipped, including the `.parquet` artifact a previous run may have left
/// behind. Within a kind, candidates are ordered lexicographically by file
/// name and the first wins; the rest come back in
/// [`LocatedSource::ignored`]. Kinds are tried in [`SourceKind::PRIORITY`]
/// order.
///
/// Returns [`IngestError::NoSourceFile`] when the directory holds no
/// candidate of any kind.
pub fn locate_source(dir: impl AsRef<Path>) -> IngestResult<LocatedSource> {
    let dir = dir.as_ref();
    let mut buckets: [Vec<PathBuf>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(kind) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceKind::from_extension)
        else {
            continue;
        };
        buckets[kind as usize].push(path);
    }

    for kind in SourceKind::PRIORITY {
        let candidates = &mut buckets[kind as usize];
        if candidates.is_empty() {
            continue;
        }
        candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        let path = candidates.remove(0);
        return Ok(LocatedSource {
            path,
            kind,
            ignored: std::mem::take(candidates),
        });
    }

    Err(IngestError::NoSourceFile {
        dir: dir.to_path_buf(),
    })
}
