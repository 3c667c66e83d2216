//! Komoot Photon provider
//!
//! Photon answers with a GeoJSON feature collection; the first feature's
//! point geometry (`[lon, lat]`) is used.

use super::http::fetch_json;
use super::{GeocodingProvider, Session};
use crate::config::KomootConfig;
use crate::domain::{Coordinates, Lookup, ProviderError, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Provider name recorded in checkpoint rows
pub const KOMOOT: &str = "komoot";

/// Photon geocoding provider
pub struct KomootProvider {
    base_url: String,
    language: Option<String>,
}

impl KomootProvider {
    pub fn new(config: &KomootConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/api/", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

#[async_trait]
impl GeocodingProvider for KomootProvider {
    fn name(&self) -> &str {
        KOMOOT
    }

    async fn lookup(&self, address: &str, session: &Session) -> Result<Lookup> {
        let mut query: Vec<(&str, &str)> = vec![("q", address), ("limit", "1")];
        if let Some(language) = &self.language {
            query.push(("lang", language.as_str()));
        }

        tracing::debug!(provider = KOMOOT, address = %address, "Looking up address");

        let request = session.client().get(self.search_url()).query(&query);
        let collection: FeatureCollection = fetch_json(KOMOOT, request).await?;

        let Some(feature) = collection.features.first() else {
            return Ok(Lookup::NotFound);
        };

        match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] => Ok(Lookup::Found(Coordinates::new(*lat, *lon))),
            _ => Err(ProviderError::InvalidResponse {
                provider: KOMOOT.to_string(),
                message: format!(
                    "expected [lon, lat] geometry, got {} value(s)",
                    feature.geometry.coordinates.len()
                ),
            }
            .into()),
        }
    }
}
