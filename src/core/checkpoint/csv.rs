//! CSV checkpoint files

use super::{checkpoint_path, CheckpointSink};
use crate::domain::{GeobatchError, GeocodeResult, Result, CHECKPOINT_HEADER};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes checkpoints as `{base_path}{index}.csv`
///
/// Each file is written to a `.tmp` sibling first and renamed into place, so
/// an interrupted write never leaves a truncated checkpoint behind.
#[derive(Debug, Clone)]
pub struct CsvCheckpointWriter {
    base_path: String,
}

impl CsvCheckpointWriter {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn write_rows(path: &Path, results: &[GeocodeResult]) -> std::result::Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(CHECKPOINT_HEADER)?;
        for result in results {
            writer.write_record(result.to_row())?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl CheckpointSink for CsvCheckpointWriter {
    fn write(&mut self, results: &[GeocodeResult], index: usize) -> Result<PathBuf> {
        let path = checkpoint_path(&self.base_path, index);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                GeobatchError::Checkpoint(format!(
                    "Failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let written = Self::write_rows(&tmp, results)
            .map_err(|e| format!("Failed to write {}: {e}", tmp.display()))
            .and_then(|()| {
                fs::rename(&tmp, &path)
                    .map_err(|e| format!("Failed to move {} into place: {e}", path.display()))
            });
        if let Err(message) = written {
            // best effort; the original error is what gets reported
            let _ = fs::remove_file(&tmp);
            return Err(GeobatchError::Checkpoint(message));
        }

        crate::log_checkpoint_written!(path.display(), index, results.len());
        Ok(path)
    }
}
