//! Tabular address input
//!
//! Reads the input CSV, checks the configured column names against the header
//! and builds one [`crate::domain::AddressRecord`] per row.

pub mod csv_reader;

pub use csv_reader::{load_addresses, read_addresses};
