//! External system integrations for geobatch.
//!
//! - [`providers`] - Geocoding provider integrations (ArcGIS, Komoot Photon)
//! - [`input`] - CSV address input
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the resolver and
//! batch driver can be tested with in-memory implementations.
//!
//! ```rust,no_run
//! use geobatch::adapters::providers::{create_providers, Session};
//! use geobatch::config::{HttpConfig, ProvidersConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (primary, secondary) = create_providers(&ProvidersConfig::default())?;
//! let session = Session::new(&HttpConfig::default())?;
//!
//! let lookup = primary.lookup("380 New York St, 92373, CA", &session).await?;
//! # Ok(())
//! # }
//! ```

pub mod input;
pub mod providers;
