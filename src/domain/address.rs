//! Address records built from tabular input

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single address ready to be sent to a geocoding provider
///
/// Built once per input row by joining the street address, the optional
/// postal code and the region with `", "`. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressRecord(String);

impl AddressRecord {
    /// Build a record from its parts
    ///
    /// # Example
    ///
    /// ```
    /// use geobatch::domain::AddressRecord;
    ///
    /// let record = AddressRecord::new("1600 Pennsylvania Ave NW", Some("20500"), "DC");
    /// assert_eq!(record.as_str(), "1600 Pennsylvania Ave NW, 20500, DC");
    ///
    /// let record = AddressRecord::new("1 Main St", None, "VT");
    /// assert_eq!(record.as_str(), "1 Main St, VT");
    /// ```
    pub fn new(address: &str, postal_code: Option<&str>, region: &str) -> Self {
        let formatted = match postal_code {
            Some(postal_code) => format!("{address}, {postal_code}, {region}"),
            None => format!("{address}, {region}"),
        };
        Self(formatted)
    }

    /// Wrap an already formatted address
    pub fn from_formatted(formatted: impl Into<String>) -> Self {
        Self(formatted.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
