//! Geocoding provider adapters
//!
//! Each provider implements [`GeocodingProvider`] over its own REST API and
//! sends its requests through a caller-owned [`Session`].

pub mod arcgis;
pub mod factory;
mod http;
pub mod komoot;
pub mod traits;

pub use arcgis::ArcGisProvider;
pub use factory::{create_provider, create_providers};
pub use komoot::KomootProvider;
pub use traits::{GeocodingProvider, Session};
