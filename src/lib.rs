// geobatch - Resumable batch geocoder
// Copyright (c) 2025 Geobatch Contributors
// Licensed under the MIT License

//! # geobatch - Resumable batch geocoding
//!
//! geobatch geocodes long address lists against external geocoding services,
//! one address at a time, and periodically writes its progress to CSV
//! checkpoints so an interrupted run can be continued from a later index.
//!
//! ## Overview
//!
//! - **Resolving** each address with a primary provider (ArcGIS) and a
//!   fallback (Komoot Photon), retrying misses with doubling delays
//! - **Recovering** from transport errors with a single delayed lookup
//! - **Reporting** progress and failure counts at a fixed interval
//! - **Checkpointing** every result so far to `{base_path}{index}.csv`
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Resolver, batch driver and checkpoints
//! - [`adapters`] - Geocoding providers and CSV input
//! - [`domain`] - Addresses, results and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geobatch::adapters::input::load_addresses;
//! use geobatch::adapters::providers::create_providers;
//! use geobatch::config::load_config;
//! use geobatch::core::batch::{BatchConfig, BatchDriver};
//! use geobatch::core::checkpoint::CsvCheckpointWriter;
//! use geobatch::core::resolver::Resolver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("geobatch.toml")?;
//!     let addresses = load_addresses(&config.input)?;
//!
//!     let (primary, secondary) = create_providers(&config.providers)?;
//!     let resolver = Resolver::new(primary, secondary, config.http.clone())?;
//!     let sink = CsvCheckpointWriter::new(config.output.base_path.clone());
//!
//!     let mut driver = BatchDriver::new(resolver, sink, BatchConfig::from_settings(&config.batch)?);
//!     let summary = driver.run(&addresses).await?;
//!
//!     println!("Geocoded {} of {} addresses", summary.succeeded, summary.processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Retry Policy
//!
//! An address that no provider finds is retried `max_attempts` times. The
//! delay starts at `initial_delay` and doubles after every retry:
//!
//! ```rust
//! use geobatch::core::resolver::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(3, Duration::from_secs(3));
//! assert_eq!(policy.total_backoff(), Duration::from_secs(21));
//! ```
//!
//! ## Error Handling
//!
//! geobatch uses the [`domain::GeobatchError`] type for all errors:
//!
//! ```rust,no_run
//! use geobatch::domain::GeobatchError;
//!
//! fn example() -> Result<(), GeobatchError> {
//!     let config = geobatch::config::load_config("geobatch.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! geobatch uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(count = 1000, "Loaded addresses");
//! warn!(address = "1 Main St, VT", "Did not find it");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
