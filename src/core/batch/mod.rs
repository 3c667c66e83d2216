//! Batch geocoding
//!
//! - [`driver`] - Sequential driver with progress reporting and checkpoints
//! - [`state`] - Results and failure counters owned by a run
//! - [`summary`] - End-of-run reporting

pub mod driver;
pub mod state;
pub mod summary;

pub use driver::{BatchConfig, BatchDriver, TRANSPORT_RECOVERY_DELAY};
pub use state::{BatchState, ProgressWindow};
pub use summary::{progress_line, BatchSummary, ProgressReport};
