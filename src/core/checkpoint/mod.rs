//! Checkpoint persistence
//!
//! A checkpoint is a CSV snapshot of every result recorded since the start
//! index, named after the absolute index of the last address it contains:
//! `{base_path}{index}.csv`. Checkpoints are cumulative, so the newest one is
//! always a complete record of the run so far.
//!
//! The driver never reads checkpoints back. [`list_checkpoints`] exists so the
//! operator can see where a previous run stopped and pick the next start index.

pub mod csv;

pub use self::csv::CsvCheckpointWriter;

use crate::domain::{GeobatchError, GeocodeResult, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Destination for cumulative checkpoints
pub trait CheckpointSink: Send {
    /// Persist `results` as the checkpoint for absolute index `index`
    ///
    /// Returns the location that was written.
    fn write(&mut self, results: &[GeocodeResult], index: usize) -> Result<PathBuf>;
}

/// Path of the checkpoint for `index`
///
/// The base path is used as a plain prefix: `output/run_` gives
/// `output/run_42.csv`, `output/` gives `output/42.csv`.
pub fn checkpoint_path(base_path: &str, index: usize) -> PathBuf {
    PathBuf::from(format!("{base_path}{index}.csv"))
}

/// A checkpoint file found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointInfo {
    pub index: usize,
    pub path: PathBuf,
    /// Data rows, header excluded
    pub rows: usize,
    pub modified: Option<DateTime<Utc>>,
}

/// Directory and file-name prefix derived from a base path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointLayout {
    pub dir: PathBuf,
    pub prefix: String,
}

impl CheckpointLayout {
    pub fn from_base_path(base_path: &str) -> Self {
        if base_path.is_empty() {
            return Self {
                dir: PathBuf::from("."),
                prefix: String::new(),
            };
        }
        if base_path.ends_with('/') || base_path.ends_with(std::path::MAIN_SEPARATOR) {
            return Self {
                dir: PathBuf::from(base_path),
                prefix: String::new(),
            };
        }

        let path = Path::new(base_path);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        Self { dir, prefix }
    }

    fn pattern(&self) -> Result<Regex> {
        Regex::new(&format!(r"^{}(\d+)\.csv$", regex::escape(&self.prefix)))
            .map_err(|e| GeobatchError::Other(format!("Invalid checkpoint pattern: {e}")))
    }
}

/// List the checkpoints written for `base_path`, ordered by index
///
/// A missing output directory yields an empty list.
pub fn list_checkpoints(base_path: &str) -> Result<Vec<CheckpointInfo>> {
    let layout = CheckpointLayout::from_base_path(base_path);
    if !layout.dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = layout.pattern()?;
    let mut found = Vec::new();

    for entry in std::fs::read_dir(&layout.dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some(index) = pattern
            .captures(&file_name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
        else {
            continue;
        };

        let path = entry.path();
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        found.push(CheckpointInfo {
            index,
            rows: count_rows(&path)?,
            path,
            modified,
        });
    }

    found.sort_by_key(|info| info.index);
    Ok(found)
}

fn count_rows(path: &Path) -> Result<usize> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            GeobatchError::Checkpoint(format!("Failed to read {}: {e}", path.display()))
        })?;

    let mut rows = 0;
    for record in reader.records() {
        record.map_err(|e| {
            GeobatchError::Checkpoint(format!("Failed to read {}: {e}", path.display()))
        })?;
        rows += 1;
    }
    Ok(rows)
}
