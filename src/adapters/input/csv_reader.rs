//! CSV address loader

use crate::config::InputConfig;
use crate::domain::{AddressRecord, GeobatchError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    address: usize,
    region: usize,
    postal_code: Option<usize>,
}

impl ColumnLayout {
    /// Resolve the configured column names against the header
    ///
    /// A missing required column is a configuration error: nothing has been
    /// geocoded yet, so the run is aborted.
    fn resolve(headers: &csv::StringRecord, config: &InputConfig) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name.trim());

        let address = find(&config.address_column).ok_or_else(|| {
            GeobatchError::Configuration(format!(
                "Can't find the address column '{}' in the input file.",
                config.address_column
            ))
        })?;
        let region = find(&config.region_column).ok_or_else(|| {
            GeobatchError::Configuration(format!(
                "Can't find the region column '{}' in the input file.",
                config.region_column
            ))
        })?;
        let postal_code = match config.postal_code_column() {
            Some(column) => Some(find(column).ok_or_else(|| {
                GeobatchError::Configuration(format!(
                    "Can't find the postal code column '{column}' in the input file."
                ))
            })?),
            None => None,
        };

        Ok(Self {
            address,
            region,
            postal_code,
        })
    }

    fn build(&self, record: &csv::StringRecord) -> AddressRecord {
        let field = |index: usize| record.get(index).unwrap_or("").trim();
        AddressRecord::new(
            field(self.address),
            self.postal_code.map(field),
            field(self.region),
        )
    }
}

/// Load every address of the configured input file, in file order
///
/// # Errors
///
/// Returns a configuration error when a configured column is missing, and an
/// input error when the file cannot be opened or a row cannot be parsed.
pub fn load_addresses(config: &InputConfig) -> Result<Vec<AddressRecord>> {
    let path = Path::new(&config.path);
    let file = File::open(path).map_err(|e| {
        GeobatchError::Input(format!("Failed to open input file {}: {e}", path.display()))
    })?;

    let addresses = read_addresses(file, config)?;
    tracing::info!(
        path = %path.display(),
        count = addresses.len(),
        postal_code = config.postal_code_column().is_some(),
        "Loaded addresses"
    );
    Ok(addresses)
}

/// Read addresses from any CSV source with a header row
pub fn read_addresses<R: Read>(source: R, config: &InputConfig) -> Result<Vec<AddressRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| GeobatchError::Input(format!("Failed to read CSV header: {e}")))?
        .clone();
    let layout = ColumnLayout::resolve(&headers, config)?;

    let mut addresses = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            // +2: one for the header, one for 1-based line numbers
            GeobatchError::Input(format!("Failed to parse CSV row {}: {e}", row + 2))
        })?;
        addresses.push(layout.build(&record));
    }

    Ok(addresses)
}
