//! Domain models and types for geobatch.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Address records** ([`AddressRecord`]) built from input rows
//! - **Geocoding outcomes** ([`Lookup`], [`ProviderMatch`], [`GeocodeResult`])
//! - **Error types** ([`GeobatchError`], [`ProviderError`])
//! - **Result type alias** ([`Result`])
//!
//! # Tagged results
//!
//! Every address of a batch ends up as exactly one [`GeocodeResult`]:
//!
//! ```rust
//! use geobatch::domain::{Coordinates, GeocodeResult, ProviderMatch};
//!
//! let found = GeocodeResult::success(
//!     "1 Main St, VT",
//!     ProviderMatch { coordinates: Coordinates::new(44.26, -72.58), provider: "arcgis".into() },
//! );
//! let missing = GeocodeResult::not_found("nowhere");
//!
//! assert!(!found.is_failure());
//! assert_eq!(missing.to_row(), ["nowhere", "was", "not", "geocoded"]);
//! ```

pub mod address;
pub mod errors;
pub mod geocode;
pub mod result;

// Re-export commonly used types for convenience
pub use address::AddressRecord;
pub use errors::{GeobatchError, ProviderError};
pub use geocode::{
    Coordinates, GeocodeResult, Lookup, ProviderMatch, CHECKPOINT_HEADER, ERROR_MARKER,
    NOT_FOUND_MARKER,
};
pub use result::Result;
