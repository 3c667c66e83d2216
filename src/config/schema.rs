//! Configuration schema types
//!
//! This module defines the configuration structure for geobatch.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider names understood by the provider factory
pub const SUPPORTED_PROVIDERS: [&str; 2] = ["arcgis", "komoot"];

/// Main geobatch configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeobatchConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Input file and column names
    pub input: InputConfig,

    /// Checkpoint output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Batch driver settings (offsets, intervals, retries)
    #[serde(default)]
    pub batch: BatchSettings,

    /// Geocoding providers
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// HTTP session settings shared by all providers
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GeobatchConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.output.validate()?;
        self.batch.validate()?;
        self.providers.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Input file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path of the CSV file with a header row
    pub path: String,

    /// Column holding the street address
    #[serde(default = "default_address_column")]
    pub address_column: String,

    /// Column holding the region (state, province, country)
    #[serde(default = "default_region_column")]
    pub region_column: String,

    /// Column holding the postal code; empty or absent disables it
    #[serde(default = "default_postal_code_column")]
    pub postal_code_column: Option<String>,
}

impl InputConfig {
    /// Postal code column, if one is configured
    pub fn postal_code_column(&self) -> Option<&str> {
        self.postal_code_column
            .as_deref()
            .filter(|column| !column.trim().is_empty())
    }

    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("input.path cannot be empty".to_string());
        }
        if self.address_column.trim().is_empty() {
            return Err("input.address_column cannot be empty".to_string());
        }
        if self.region_column.trim().is_empty() {
            return Err("input.region_column cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: "input.csv".to_string(),
            address_column: default_address_column(),
            region_column: default_region_column(),
            postal_code_column: default_postal_code_column(),
        }
    }
}

/// Checkpoint output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix of every checkpoint file; files are named `{base_path}{index}.csv`
    #[serde(default = "default_output_base_path")]
    pub base_path: String,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_path.trim().is_empty() {
            return Err("output.base_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: default_output_base_path(),
        }
    }
}

/// Batch driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Absolute index of the first address to process
    #[serde(default)]
    pub start_index: usize,

    /// Emit a progress line every N addresses
    #[serde(default = "default_status_interval")]
    pub status_interval: usize,

    /// Write a checkpoint every N addresses
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,

    /// Retries after the first failed attempt before giving up on an address
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Delay before the first retry; doubles on every further retry
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

impl BatchSettings {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    fn validate(&self) -> Result<(), String> {
        if self.status_interval == 0 {
            return Err("batch.status_interval must be greater than 0".to_string());
        }
        if self.checkpoint_interval == 0 {
            return Err("batch.checkpoint_interval must be greater than 0".to_string());
        }
        if self.max_attempts > MAX_RETRY_ATTEMPTS {
            return Err(format!(
                "batch.max_attempts must be at most {MAX_RETRY_ATTEMPTS}, got {}",
                self.max_attempts
            ));
        }
        Ok(())
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            start_index: 0,
            status_interval: default_status_interval(),
            checkpoint_interval: default_checkpoint_interval(),
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

// The delay doubles per retry, so anything beyond this waits for days.
const MAX_RETRY_ATTEMPTS: usize = 16;

/// Geocoding provider selection and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Provider queried first on every attempt
    #[serde(default = "default_primary_provider")]
    pub primary: String,

    /// Provider queried when the primary finds nothing
    #[serde(default = "default_secondary_provider")]
    pub secondary: String,

    /// ArcGIS World Geocoding Service
    #[serde(default)]
    pub arcgis: ArcGisConfig,

    /// Komoot Photon
    #[serde(default)]
    pub komoot: KomootConfig,
}

impl ProvidersConfig {
    fn validate(&self) -> Result<(), String> {
        for (role, name) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            if !SUPPORTED_PROVIDERS.contains(&name.to_lowercase().as_str()) {
                return Err(format!(
                    "Invalid providers.{role} '{name}'. Must be one of: {}",
                    SUPPORTED_PROVIDERS.join(", ")
                ));
            }
        }
        validate_url("providers.arcgis.base_url", &self.arcgis.base_url)?;
        validate_url("providers.komoot.base_url", &self.komoot.base_url)?;
        Ok(())
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_provider(),
            secondary: default_secondary_provider(),
            arcgis: ArcGisConfig::default(),
            komoot: KomootConfig::default(),
        }
    }
}

/// ArcGIS World Geocoding Service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcGisConfig {
    /// GeocodeServer base URL
    #[serde(default = "default_arcgis_base_url")]
    pub base_url: String,

    /// Optional API key; anonymous requests work without one
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl Default for ArcGisConfig {
    fn default() -> Self {
        Self {
            base_url: default_arcgis_base_url(),
            api_key: None,
        }
    }
}

/// Komoot Photon settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KomootConfig {
    /// Photon base URL
    #[serde(default = "default_komoot_base_url")]
    pub base_url: String,

    /// Preferred result language (e.g. "en", "de")
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for KomootConfig {
    fn default() -> Self {
        Self {
            base_url: default_komoot_base_url(),
            language: None,
        }
    }
}

/// HTTP session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// User-Agent header sent to providers
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("http.timeout_seconds must be greater than 0".to_string());
        }
        if self.connect_timeout_seconds == 0 {
            return Err("http.connect_timeout_seconds must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("http.user_agent cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rolling file in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory of the log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled is true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_address_column() -> String {
    "ADDRESS".to_string()
}

fn default_region_column() -> String {
    "STATE".to_string()
}

fn default_postal_code_column() -> Option<String> {
    Some("ZIP_CODE".to_string())
}

fn default_output_base_path() -> String {
    "output".to_string()
}

fn default_status_interval() -> usize {
    100
}

fn default_checkpoint_interval() -> usize {
    1000
}

fn default_max_attempts() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    3000
}

fn default_primary_provider() -> String {
    "arcgis".to_string()
}

fn default_secondary_provider() -> String {
    "komoot".to_string()
}

fn default_arcgis_base_url() -> String {
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer".to_string()
}

fn default_komoot_base_url() -> String {
    "https://photon.komoot.io".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("geobatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
