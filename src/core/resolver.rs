//! Address resolution with provider fallback and bounded retries
//!
//! One attempt asks the primary provider and, when it finds nothing, the
//! secondary. Failed attempts are retried after a delay that doubles every
//! time, with fresh provider sessions for each retry.
//!
//! The secondary is consulted on every attempt, not only the last one.
//!
//! Transport errors are not retried here; they are returned to the caller,
//! which decides how to recover.
//!
//! A shutdown signal cuts a backoff wait short. The address is then left
//! unresolved so that a later run can start from it.

use crate::adapters::providers::{GeocodingProvider, Session};
use crate::config::{BatchSettings, HttpConfig};
use crate::domain::{Lookup, ProviderMatch, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Sleep for `delay` unless `shutdown` turns `true` first
///
/// Returns `false` when the wait was cut short. A closed channel can no
/// longer signal, so the full delay is slept.
pub(crate) async fn wait_unless_stopped(
    delay: Duration,
    shutdown: Option<&mut watch::Receiver<bool>>,
) -> bool {
    let Some(shutdown) = shutdown else {
        tokio::time::sleep(delay).await;
        return true;
    };

    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    let stopped = tokio::select! {
        () = &mut sleep => return true,
        stopped = stop_requested(shutdown) => stopped,
    };
    if stopped {
        return false;
    }

    sleep.await;
    true
}

async fn stop_requested(shutdown: &mut watch::Receiver<bool>) -> bool {
    shutdown.wait_for(|stop| *stop).await.is_ok()
}

/// Retry budget for a single address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` means a single attempt
    pub max_attempts: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    pub fn from_settings(settings: &BatchSettings) -> Self {
        Self::new(settings.max_attempts, settings.initial_delay())
    }

    /// Delays slept before each retry, in order
    ///
    /// ```
    /// use geobatch::core::resolver::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_secs(3));
    /// let delays: Vec<u64> = policy.backoff_schedule().map(|d| d.as_secs()).collect();
    /// assert_eq!(delays, vec![3, 6, 12]);
    /// assert_eq!(policy.total_backoff(), Duration::from_secs(21));
    /// ```
    pub fn backoff_schedule(&self) -> impl Iterator<Item = Duration> {
        let initial = self.initial_delay;
        (0..self.max_attempts).map(move |retry| initial.saturating_mul(1u32 << retry.min(31)))
    }

    /// Total time slept before giving up on an address that is never found
    pub fn total_backoff(&self) -> Duration {
        self.backoff_schedule()
            .fold(Duration::ZERO, |total, delay| total.saturating_add(delay))
    }
}

/// Outcome of resolving one address
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Location and provider, or `None` once every attempt found nothing
    pub found: Option<ProviderMatch>,
    /// Attempts made, including the first
    pub attempts: usize,
    /// Total time slept between attempts
    pub backoff: Duration,
    /// A shutdown signal arrived during a backoff wait
    pub interrupted: bool,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }
}

/// One HTTP session per provider
struct ProviderSessions {
    primary: Session,
    secondary: Session,
}

impl ProviderSessions {
    fn new(http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            primary: Session::new(http)?,
            secondary: Session::new(http)?,
        })
    }
}

/// Resolves addresses against a primary and a fallback provider
pub struct Resolver {
    primary: Arc<dyn GeocodingProvider>,
    secondary: Arc<dyn GeocodingProvider>,
    http: HttpConfig,
    sessions: ProviderSessions,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Resolver {
    /// Create a resolver with fresh sessions for both providers
    pub fn new(
        primary: Arc<dyn GeocodingProvider>,
        secondary: Arc<dyn GeocodingProvider>,
        http: HttpConfig,
    ) -> Result<Self> {
        let sessions = ProviderSessions::new(&http)?;
        Ok(Self {
            primary,
            secondary,
            http,
            sessions,
            shutdown: None,
        })
    }

    /// Abandon backoff waits once `shutdown` turns `true`
    pub fn watch_shutdown(&mut self, shutdown: watch::Receiver<bool>) {
        self.shutdown = Some(shutdown);
    }

    /// Drop both sessions and open new ones
    pub fn renew_sessions(&mut self) -> Result<()> {
        self.sessions = ProviderSessions::new(&self.http)?;
        tracing::debug!(
            primary_session = self.sessions.primary.id(),
            secondary_session = self.sessions.secondary.id(),
            "Renewed provider sessions"
        );
        Ok(())
    }

    /// A single attempt: primary first, secondary if the primary finds nothing
    pub async fn lookup_once(&self, address: &str) -> Result<Option<ProviderMatch>> {
        for (provider, session) in [
            (&self.primary, &self.sessions.primary),
            (&self.secondary, &self.sessions.secondary),
        ] {
            if let Lookup::Found(coordinates) = provider.lookup(address, session).await? {
                return Ok(Some(ProviderMatch {
                    coordinates,
                    provider: provider.name().to_string(),
                }));
            }
        }
        Ok(None)
    }

    /// Resolve an address, retrying with doubling delays until a provider
    /// finds it or the retry budget is spent
    ///
    /// # Errors
    ///
    /// Returns the first transport error raised by a provider, or a session
    /// error if sessions cannot be renewed between attempts.
    pub async fn resolve(&mut self, address: &str, policy: &RetryPolicy) -> Result<Resolution> {
        let mut remaining = policy.max_attempts;
        let mut delay = policy.initial_delay;
        let mut attempts = 0;
        let mut backoff = Duration::ZERO;

        loop {
            attempts += 1;
            if let Some(found) = self.lookup_once(address).await? {
                tracing::debug!(
                    address = %address,
                    provider = %found.provider,
                    attempts,
                    "Address resolved"
                );
                return Ok(Resolution {
                    found: Some(found),
                    attempts,
                    backoff,
                    interrupted: false,
                });
            }

            if remaining == 0 {
                return Ok(Resolution {
                    found: None,
                    attempts,
                    backoff,
                    interrupted: false,
                });
            }

            crate::log_retry_attempt!(address, attempts, policy.max_attempts + 1, delay);
            if !wait_unless_stopped(delay, self.shutdown.as_mut()).await {
                tracing::warn!(address = %address, attempts, "Shutdown requested during backoff");
                return Ok(Resolution {
                    found: None,
                    attempts,
                    backoff,
                    interrupted: true,
                });
            }
            backoff += delay;
            self.renew_sessions()?;

            delay = delay.saturating_add(delay);
            remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Answer, ScriptedProvider};
    use crate::domain::{Coordinates, GeobatchError};
    use std::collections::HashSet;
    use tokio::time::Instant;

    fn resolver(primary: &Arc<ScriptedProvider>, secondary: &Arc<ScriptedProvider>) -> Resolver {
        Resolver::new(primary.clone(), secondary.clone(), HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_primary_success_names_primary() {
        let primary = ScriptedProvider::new("arcgis", vec![Answer::Found(1.0, 2.0)]);
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);

        let resolution = resolver
            .resolve("1 Main St", &RetryPolicy::new(3, Duration::from_secs(3)))
            .await
            .unwrap();

        let found = resolution.found.unwrap();
        assert_eq!(found.provider, "arcgis");
        assert_eq!(found.coordinates, Coordinates::new(1.0, 2.0));
        assert_eq!(resolution.attempts, 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_secondary_used_when_primary_declines() {
        let primary = ScriptedProvider::new("arcgis", vec![Answer::NotFound]);
        let secondary = ScriptedProvider::new("komoot", vec![Answer::Found(52.5, 13.4)]);
        let mut resolver = resolver(&primary, &secondary);

        let resolution = resolver
            .resolve("Alexanderplatz", &RetryPolicy::new(3, Duration::from_secs(3)))
            .await
            .unwrap();

        assert_eq!(resolution.found.unwrap().provider, "komoot");
        assert_eq!(resolution.attempts, 1);
        assert_eq!(resolution.backoff, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_doubling_backoff() {
        let primary = ScriptedProvider::new("arcgis", vec![]);
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);

        let start = Instant::now();
        let resolution = resolver
            .resolve("nowhere", &RetryPolicy::new(3, Duration::from_secs(3)))
            .await
            .unwrap();

        assert!(!resolution.is_found());
        assert_eq!(resolution.attempts, 4);
        assert_eq!(resolution.backoff, Duration::from_secs(21));
        assert_eq!(start.elapsed(), Duration::from_secs(21));
        // fallback is consulted on every attempt
        assert_eq!(primary.calls(), 4);
        assert_eq!(secondary.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_retry_uses_new_sessions() {
        let primary = ScriptedProvider::new("arcgis", vec![]);
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);

        resolver
            .resolve("nowhere", &RetryPolicy::new(3, Duration::from_secs(3)))
            .await
            .unwrap();

        for ids in [primary.session_ids(), secondary.session_ids()] {
            assert_eq!(ids.len(), 4);
            let distinct: HashSet<u64> = ids.iter().copied().collect();
            assert_eq!(distinct.len(), 4, "session reused across attempts: {ids:?}");
        }
        assert!(primary
            .session_ids()
            .iter()
            .all(|id| !secondary.session_ids().contains(id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cuts_backoff_short() {
        let primary = ScriptedProvider::new("arcgis", vec![]);
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);
        let (tx, rx) = watch::channel(false);
        resolver.watch_shutdown(rx);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            tx.send(true).unwrap();
        });

        let start = Instant::now();
        let resolution = resolver
            .resolve("nowhere", &RetryPolicy::new(16, Duration::from_secs(3)))
            .await
            .unwrap();

        assert!(resolution.interrupted);
        assert!(!resolution.is_found());
        assert_eq!(resolution.attempts, 1);
        assert_eq!(resolution.backoff, Duration::ZERO);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_shutdown_channel_keeps_full_backoff() {
        let primary = ScriptedProvider::new("arcgis", vec![]);
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);
        let (tx, rx) = watch::channel(false);
        resolver.watch_shutdown(rx);
        drop(tx);

        let start = Instant::now();
        let resolution = resolver
            .resolve("nowhere", &RetryPolicy::new(2, Duration::from_secs(3)))
            .await
            .unwrap();

        assert!(!resolution.interrupted);
        assert_eq!(resolution.attempts, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_retry_is_returned() {
        let primary = ScriptedProvider::new(
            "arcgis",
            vec![Answer::NotFound, Answer::NotFound, Answer::Found(10.0, 20.0)],
        );
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);

        let start = Instant::now();
        let resolution = resolver
            .resolve("retry me", &RetryPolicy::new(3, Duration::from_secs(3)))
            .await
            .unwrap();

        assert_eq!(resolution.found.unwrap().provider, "arcgis");
        assert_eq!(resolution.attempts, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_makes_single_attempt() {
        let primary = ScriptedProvider::new("arcgis", vec![]);
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);

        let start = Instant::now();
        let resolution = resolver
            .resolve("nowhere", &RetryPolicy::new(0, Duration::from_secs(3)))
            .await
            .unwrap();

        assert_eq!(resolution.attempts, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_returned_without_retry() {
        let primary = ScriptedProvider::new("arcgis", vec![Answer::NotFound, Answer::Fail]);
        let secondary = ScriptedProvider::new("komoot", vec![]);
        let mut resolver = resolver(&primary, &secondary);

        let start = Instant::now();
        let err = resolver
            .resolve("flaky", &RetryPolicy::new(3, Duration::from_secs(3)))
            .await
            .unwrap_err();

        assert!(matches!(err, GeobatchError::Provider(_)));
        // one backoff happened before the failing second attempt
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(primary.calls(), 2);
    }

    #[tokio::test]
    async fn test_primary_error_skips_secondary() {
        let primary = ScriptedProvider::new("arcgis", vec![Answer::Fail]);
        let secondary = ScriptedProvider::new("komoot", vec![Answer::Found(1.0, 1.0)]);
        let resolver = resolver(&primary, &secondary);

        assert!(resolver.lookup_once("x").await.is_err());
        assert_eq!(secondary.calls(), 0);
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::new(4, Duration::from_millis(500));
        let delays: Vec<Duration> = policy.backoff_schedule().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(500),
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
            ]
        );
        assert_eq!(RetryPolicy::new(0, Duration::from_secs(3)).total_backoff(), Duration::ZERO);
    }
}
