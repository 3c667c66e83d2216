//! Geocoding provider trait definition
//!
//! This module defines the `GeocodingProvider` trait that abstracts the
//! provider-specific REST APIs, and the [`Session`] each provider uses to
//! send its requests. Sessions are owned by the caller so that a failed
//! lookup can be followed by a fresh connection pool.

use crate::config::HttpConfig;
use crate::domain::{Lookup, ProviderError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// HTTP session used by one provider
///
/// Wraps a `reqwest::Client` (and therefore its connection pool). Build a
/// new one to drop any stateful connection after a failure.
#[derive(Debug, Clone)]
pub struct Session {
    id: u64,
    client: Client,
}

impl Session {
    /// Create a new session from the HTTP settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialize).
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::Session(e.to_string()))?;

        Ok(Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            client,
        })
    }

    /// Process-unique number of this session; clones share it
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Trait for geocoding provider implementations
///
/// A provider answers "not found" with `Ok(Lookup::NotFound)`. `Err` is
/// reserved for transport-level failures: timeouts, refused connections,
/// error statuses and unreadable bodies.
///
/// # Example
///
/// ```no_run
/// use geobatch::adapters::providers::{ArcGisProvider, GeocodingProvider, Session};
/// use geobatch::config::{ArcGisConfig, HttpConfig};
/// use geobatch::domain::Lookup;
///
/// # async fn example() -> geobatch::domain::Result<()> {
/// let provider = ArcGisProvider::new(&ArcGisConfig::default());
/// let session = Session::new(&HttpConfig::default())?;
///
/// match provider.lookup("380 New York St, Redlands, CA", &session).await? {
///     Lookup::Found(coordinates) => println!("{}, {}", coordinates.lat, coordinates.lon),
///     Lookup::NotFound => println!("no match"),
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Short provider name recorded in the Provider column
    fn name(&self) -> &str;

    /// Look up the coordinates of a single formatted address
    async fn lookup(&self, address: &str, session: &Session) -> Result<Lookup>;
}
