//! Batch summary and reporting

use super::state::ProgressWindow;
use std::path::PathBuf;
use std::time::Duration;

/// Progress line printed every `status_interval` addresses
pub fn progress_line(absolute_index: usize, remaining: usize, window: usize, total: usize) -> String {
    format!(
        "Completed {absolute_index} of {remaining}. Failed {window} for this section and {total} in total."
    )
}

/// One progress report emitted during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    /// Absolute index of the address about to be processed
    pub absolute_index: usize,
    /// Addresses this run was started with
    pub remaining: usize,
    pub failures: ProgressWindow,
}

impl ProgressReport {
    pub fn line(&self) -> String {
        progress_line(
            self.absolute_index,
            self.remaining,
            self.failures.window,
            self.failures.total,
        )
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Absolute index the run started from
    pub start_index: usize,

    /// Addresses processed by this run
    pub processed: usize,

    /// Addresses a provider located
    pub succeeded: usize,

    /// Addresses no provider found after every retry
    pub not_found: usize,

    /// Addresses recorded with a transport error
    pub errors: usize,

    /// Absolute index of the last processed address
    pub last_index: Option<usize>,

    /// Checkpoint files written, in order
    pub checkpoints: Vec<PathBuf>,

    /// Progress reports emitted, in order
    pub progress: Vec<ProgressReport>,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// The run stopped early on a shutdown signal
    pub interrupted: bool,
}

impl BatchSummary {
    pub fn new(start_index: usize) -> Self {
        Self {
            start_index,
            ..Self::default()
        }
    }

    pub fn failed(&self) -> usize {
        self.not_found + self.errors
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.processed as f64) * 100.0
    }

    /// Start index that continues where this run stopped
    pub fn next_start_index(&self) -> Option<usize> {
        self.last_index.map(|index| index + 1)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            start_index = self.start_index,
            processed = self.processed,
            succeeded = self.succeeded,
            not_found = self.not_found,
            errors = self.errors,
            last_index = ?self.last_index,
            checkpoints = self.checkpoints.len(),
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Batch completed"
        );

        if self.interrupted {
            tracing::warn!(
                next_start_index = ?self.next_start_index(),
                "Batch interrupted by shutdown signal"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_rates() {
        let summary = BatchSummary {
            processed: 4,
            succeeded: 3,
            not_found: 1,
            ..BatchSummary::new(10)
        };

        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.success_rate(), 75.0);
        assert_eq!(summary.start_index, 10);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::new(0);
        assert_eq!(summary.success_rate(), 100.0);
        assert_eq!(summary.next_start_index(), None);
    }

    #[test]
    fn test_progress_line_format() {
        assert_eq!(
            progress_line(200, 950, 3, 7),
            "Completed 200 of 950. Failed 3 for this section and 7 in total."
        );

        let report = ProgressReport {
            absolute_index: 5,
            remaining: 8,
            failures: ProgressWindow { window: 2, total: 2 },
        };
        assert_eq!(
            report.line(),
            "Completed 5 of 8. Failed 2 for this section and 2 in total."
        );
    }

    #[test]
    fn test_next_start_index() {
        let summary = BatchSummary {
            last_index: Some(41),
            ..BatchSummary::new(0)
        };
        assert_eq!(summary.next_start_index(), Some(42));
    }
}
