//! Geocoding outcomes
//!
//! A provider answers a single lookup with a [`Lookup`]; the batch records one
//! [`GeocodeResult`] per address.

use serde::{Deserialize, Serialize};

/// Column headers of every checkpoint file
pub const CHECKPOINT_HEADER: [&str; 4] = ["Address", "Lat", "Long", "Provider"];

/// Marker written in the Lat/Long/Provider columns for an address no provider found
pub const NOT_FOUND_MARKER: [&str; 3] = ["was", "not", "geocoded"];

/// Marker written in the Provider column for an address that failed with an error
pub const ERROR_MARKER: &str = "ERROR";

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Answer of a single provider lookup
///
/// "Not found" is a normal answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    Found(Coordinates),
    NotFound,
}

/// A location together with the provider that found it
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderMatch {
    pub coordinates: Coordinates,
    pub provider: String,
}

/// Recorded outcome for one address of the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeResult {
    /// A provider returned coordinates
    Success {
        address: String,
        lat: f64,
        lon: f64,
        provider: String,
    },
    /// Every attempt was exhausted without a match
    NotFound { address: String },
    /// A transport failure survived the recovery attempt
    Error { address: String, description: String },
}

impl GeocodeResult {
    pub fn success(address: impl Into<String>, found: ProviderMatch) -> Self {
        GeocodeResult::Success {
            address: address.into(),
            lat: found.coordinates.lat,
            lon: found.coordinates.lon,
            provider: found.provider,
        }
    }

    pub fn not_found(address: impl Into<String>) -> Self {
        GeocodeResult::NotFound {
            address: address.into(),
        }
    }

    pub fn error(address: impl Into<String>, description: impl Into<String>) -> Self {
        GeocodeResult::Error {
            address: address.into(),
            description: description.into(),
        }
    }

    pub fn address(&self) -> &str {
        match self {
            GeocodeResult::Success { address, .. }
            | GeocodeResult::NotFound { address }
            | GeocodeResult::Error { address, .. } => address,
        }
    }

    /// Anything other than a success counts against the failure counters
    pub fn is_failure(&self) -> bool {
        !matches!(self, GeocodeResult::Success { .. })
    }

    /// Render as a checkpoint row: `Address, Lat, Long, Provider`
    pub fn to_row(&self) -> [String; 4] {
        match self {
            GeocodeResult::Success {
                address,
                lat,
                lon,
                provider,
            } => [
                address.clone(),
                lat.to_string(),
                lon.to_string(),
                provider.clone(),
            ],
            GeocodeResult::NotFound { address } => [
                address.clone(),
                NOT_FOUND_MARKER[0].to_string(),
                NOT_FOUND_MARKER[1].to_string(),
                NOT_FOUND_MARKER[2].to_string(),
            ],
            GeocodeResult::Error {
                address,
                description,
            } => [
                address.clone(),
                description.clone(),
                description.clone(),
                ERROR_MARKER.to_string(),
            ],
        }
    }
}
