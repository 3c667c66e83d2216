//! Sequential batch driver
//!
//! Walks the addresses from the start index, one at a time, reporting
//! progress every `status_interval` addresses and persisting a cumulative
//! checkpoint every `checkpoint_interval` addresses and once at the end.

use super::state::BatchState;
use super::summary::{BatchSummary, ProgressReport};
use crate::config::BatchSettings;
use crate::core::checkpoint::CheckpointSink;
use crate::core::resolver::{wait_unless_stopped, Resolver, RetryPolicy};
use crate::domain::{AddressRecord, GeobatchError, GeocodeResult, Result};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Wait before the single recovery lookup that follows a transport error
pub const TRANSPORT_RECOVERY_DELAY: Duration = Duration::from_secs(5);

/// Configuration of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Absolute index of the first address to process
    pub start_index: usize,
    /// Emit a progress line whenever the absolute index is a multiple of this
    pub status_interval: usize,
    /// Write a checkpoint whenever the loop index is a nonzero multiple of this
    pub checkpoint_interval: usize,
    pub retry: RetryPolicy,
}

impl BatchConfig {
    /// Create a batch configuration
    ///
    /// # Errors
    ///
    /// Both intervals must be greater than zero.
    pub fn new(
        start_index: usize,
        status_interval: usize,
        checkpoint_interval: usize,
        retry: RetryPolicy,
    ) -> Result<Self> {
        if status_interval == 0 {
            return Err(GeobatchError::Configuration(
                "status interval must be greater than 0".to_string(),
            ));
        }
        if checkpoint_interval == 0 {
            return Err(GeobatchError::Configuration(
                "checkpoint interval must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            start_index,
            status_interval,
            checkpoint_interval,
            retry,
        })
    }

    pub fn from_settings(settings: &BatchSettings) -> Result<Self> {
        Self::new(
            settings.start_index,
            settings.status_interval,
            settings.checkpoint_interval,
            RetryPolicy::from_settings(settings),
        )
    }
}

/// Geocodes a list of addresses sequentially
pub struct BatchDriver<S: CheckpointSink> {
    resolver: Resolver,
    sink: S,
    config: BatchConfig,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<S: CheckpointSink> BatchDriver<S> {
    pub fn new(resolver: Resolver, sink: S, config: BatchConfig) -> Self {
        Self {
            resolver,
            sink,
            config,
            shutdown: None,
        }
    }

    /// Stop once `shutdown` turns `true`
    ///
    /// The signal is checked between addresses and also ends any retry or
    /// recovery wait. An address whose wait was cut short is not recorded.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.resolver.watch_shutdown(shutdown.clone());
        self.shutdown = Some(shutdown);
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Geocode `addresses` from the configured start index
    ///
    /// # Errors
    ///
    /// Returns an input error for an empty list, a configuration error when
    /// the start index is past the end, and a checkpoint error when a
    /// checkpoint cannot be written. Provider failures never abort the run;
    /// they are recorded per address.
    pub async fn run(&mut self, addresses: &[AddressRecord]) -> Result<BatchSummary> {
        let start = self.config.start_index;
        if addresses.is_empty() {
            return Err(GeobatchError::Input(
                "The input file contains no addresses".to_string(),
            ));
        }
        if start >= addresses.len() {
            return Err(GeobatchError::Configuration(format!(
                "Start index {start} is past the end of the input ({} addresses)",
                addresses.len()
            )));
        }

        let started = Instant::now();
        let remaining = addresses.len() - start;
        let mut state = BatchState::new();
        let mut summary = BatchSummary::new(start);

        tracing::info!(
            start_index = start,
            remaining,
            status_interval = self.config.status_interval,
            checkpoint_interval = self.config.checkpoint_interval,
            max_attempts = self.config.retry.max_attempts,
            "Starting batch"
        );

        for (i, address) in addresses[start..].iter().enumerate() {
            if self.shutdown_requested() {
                tracing::warn!(
                    absolute_index = start + i,
                    "Shutdown requested, stopping before the next address"
                );
                summary.interrupted = true;
                break;
            }

            let absolute_index = start + i;
            if absolute_index % self.config.status_interval == 0 {
                let report = ProgressReport {
                    absolute_index,
                    remaining,
                    failures: state.roll_window(),
                };
                let line = report.line();
                println!("{line}");
                tracing::info!(
                    absolute_index,
                    window_failures = report.failures.window,
                    total_failures = report.failures.total,
                    "{line}"
                );
                summary.progress.push(report);
            }

            let Some(result) = self.geocode(address).await else {
                tracing::warn!(
                    absolute_index,
                    "Shutdown requested, leaving the current address for the next run"
                );
                summary.interrupted = true;
                break;
            };
            state.push(result);
            summary.last_index = Some(absolute_index);

            if i % self.config.checkpoint_interval == 0 && i != 0 {
                let path = self.sink.write(state.results(), absolute_index)?;
                summary.checkpoints.push(path);
            }
        }

        match summary.last_index {
            Some(last_index) => {
                let path = self.sink.write(state.results(), last_index)?;
                summary.checkpoints.push(path);
            }
            None => tracing::warn!("No address was processed, skipping the final checkpoint"),
        }

        summary.processed = state.processed();
        summary.succeeded = state.succeeded();
        summary.not_found = state.not_found();
        summary.errors = state.errors();
        summary.duration = started.elapsed();

        println!("Finished!");
        summary.log_summary();
        Ok(summary)
    }

    /// Resolve one address, falling back to a single recovery lookup when
    /// the resolver hits a transport error
    ///
    /// `None` means a shutdown signal interrupted a wait.
    async fn geocode(&mut self, address: &AddressRecord) -> Option<GeocodeResult> {
        match self.resolver.resolve(address.as_str(), &self.config.retry).await {
            Ok(resolution) if resolution.interrupted => None,
            Ok(resolution) => Some(match resolution.found {
                Some(found) => GeocodeResult::success(address.as_str(), found),
                None => {
                    tracing::info!(address = %address, "Did not find it");
                    GeocodeResult::not_found(address.as_str())
                }
            }),
            Err(err) => self.recover(address, err).await,
        }
    }

    async fn recover(&mut self, address: &AddressRecord, err: GeobatchError) -> Option<GeocodeResult> {
        crate::log_error_with_context!(
            err,
            "Lookup failed, retrying once",
            address = %address,
            delay_secs = TRANSPORT_RECOVERY_DELAY.as_secs()
        );
        if !wait_unless_stopped(TRANSPORT_RECOVERY_DELAY, self.shutdown.as_mut()).await {
            return None;
        }

        if let Err(err) = self.resolver.renew_sessions() {
            return Some(GeocodeResult::error(address.as_str(), err.to_string()));
        }

        let result = match self.resolver.lookup_once(address.as_str()).await {
            Ok(Some(found)) => GeocodeResult::success(address.as_str(), found),
            Ok(None) => {
                tracing::info!(address = %address, "Did not find it");
                GeocodeResult::not_found(address.as_str())
            }
            Err(err) => {
                tracing::error!(address = %address, error = %err, "Recovery lookup failed");
                GeocodeResult::error(address.as_str(), err.to_string())
            }
        };
        Some(result)
    }
}
