//! Geocoding provider factory
//!
//! Creates provider implementations by name from the configuration.

use super::arcgis::{ArcGisProvider, ARCGIS};
use super::komoot::{KomootProvider, KOMOOT};
use super::GeocodingProvider;
use crate::config::ProvidersConfig;
use crate::domain::{GeobatchError, Result};
use std::sync::Arc;

/// Create a provider by name
///
/// # Errors
///
/// Returns a configuration error if the name is not a supported provider.
pub fn create_provider(
    name: &str,
    config: &ProvidersConfig,
) -> Result<Arc<dyn GeocodingProvider>> {
    match name.to_lowercase().as_str() {
        ARCGIS => Ok(Arc::new(ArcGisProvider::new(&config.arcgis))),
        KOMOOT => Ok(Arc::new(KomootProvider::new(&config.komoot))),
        other => Err(GeobatchError::Configuration(format!(
            "Unsupported geocoding provider: {other}. Supported providers: {ARCGIS}, {KOMOOT}"
        ))),
    }
}

/// Create the configured primary and secondary providers
pub fn create_providers(
    config: &ProvidersConfig,
) -> Result<(Arc<dyn GeocodingProvider>, Arc<dyn GeocodingProvider>)> {
    let primary = create_provider(&config.primary, config)?;
    let secondary = create_provider(&config.secondary, config)?;

    if primary.name() == secondary.name() {
        tracing::warn!(
            provider = primary.name(),
            "Primary and secondary provider are the same; fallback lookups repeat the primary"
        );
    }

    tracing::info!(
        primary = primary.name(),
        secondary = secondary.name(),
        "Geocoding providers configured"
    );

    Ok((primary, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_providers() {
        let config = ProvidersConfig::default();
        assert_eq!(create_provider("arcgis", &config).unwrap().name(), "arcgis");
        assert_eq!(create_provider("KOMOOT", &config).unwrap().name(), "komoot");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = ProvidersConfig::default();
        let result = create_provider("nominatim", &config);

        if let Err(GeobatchError::Configuration(msg)) = result {
            assert!(msg.contains("Unsupported geocoding provider"));
        } else {
            panic!("Expected Configuration error");
        }
    }

    #[test]
    fn test_create_default_pair() {
        let (primary, secondary) = create_providers(&ProvidersConfig::default()).unwrap();
        assert_eq!(primary.name(), "arcgis");
        assert_eq!(secondary.name(), "komoot");
    }
}
