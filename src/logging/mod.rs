//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr, keeping stdout for progress lines
//! - Configurable log levels
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use geobatch::logging::init_logging;
//! use geobatch::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log an error with context
///
/// Extra structured fields may follow the context.
///
/// # Example
///
/// ```no_run
/// use geobatch::log_error_with_context;
/// use geobatch::domain::GeobatchError;
///
/// let error = GeobatchError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// log_error_with_context!(&error, "Lookup failed", address = "1 Main St");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(error = %$error, "{}", $context);
    };
    ($error:expr, $context:expr, $($fields:tt)+) => {
        tracing::error!($($fields)+, error = %$error, "{}", $context);
    };
}

/// Log a retry of an address that no provider found
///
/// # Example
///
/// ```no_run
/// use geobatch::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!("1 Main St, VT", 1, 4, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($address:expr, $attempt:expr, $max_attempts:expr, $delay:expr) => {
        tracing::warn!(
            address = %$address,
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay.as_millis() as u64,
            "Not found, retrying"
        );
    };
}

/// Log a checkpoint file that was written
///
/// # Example
///
/// ```no_run
/// use geobatch::log_checkpoint_written;
///
/// log_checkpoint_written!("output/run_999.csv", 999, 1000);
/// ```
#[macro_export]
macro_rules! log_checkpoint_written {
    ($path:expr, $index:expr, $rows:expr) => {
        tracing::info!(
            path = %$path,
            index = $index,
            rows = $rows,
            "Created the file"
        );
    };
}
