//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GeobatchConfig;
use super::secret::secret_string;
use crate::domain::errors::GeobatchError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GeobatchConfig
/// 4. Applies environment variable overrides (GEOBATCH_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use geobatch::config::loader::load_config;
///
/// let config = load_config("geobatch.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GeobatchConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GeobatchError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GeobatchError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: GeobatchConfig = toml::from_str(&contents)
        .map_err(|e| GeobatchError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        GeobatchError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GeobatchError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GeobatchError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using GEOBATCH_* prefix
///
/// Environment variables follow the pattern: GEOBATCH_<SECTION>_<KEY>
/// For example: GEOBATCH_INPUT_PATH, GEOBATCH_BATCH_START_INDEX
fn apply_env_overrides(config: &mut GeobatchConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("GEOBATCH_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Input overrides
    if let Ok(val) = std::env::var("GEOBATCH_INPUT_PATH") {
        config.input.path = val;
    }
    if let Ok(val) = std::env::var("GEOBATCH_INPUT_ADDRESS_COLUMN") {
        config.input.address_column = val;
    }
    if let Ok(val) = std::env::var("GEOBATCH_INPUT_REGION_COLUMN") {
        config.input.region_column = val;
    }
    if let Ok(val) = std::env::var("GEOBATCH_INPUT_POSTAL_CODE_COLUMN") {
        config.input.postal_code_column = Some(val);
    }

    // Output overrides
    if let Ok(val) = std::env::var("GEOBATCH_OUTPUT_BASE_PATH") {
        config.output.base_path = val;
    }

    // Batch overrides
    if let Ok(val) = std::env::var("GEOBATCH_BATCH_START_INDEX") {
        if let Ok(index) = val.parse() {
            config.batch.start_index = index;
        }
    }
    if let Ok(val) = std::env::var("GEOBATCH_BATCH_STATUS_INTERVAL") {
        if let Ok(interval) = val.parse() {
            config.batch.status_interval = interval;
        }
    }
    if let Ok(val) = std::env::var("GEOBATCH_BATCH_CHECKPOINT_INTERVAL") {
        if let Ok(interval) = val.parse() {
            config.batch.checkpoint_interval = interval;
        }
    }
    if let Ok(val) = std::env::var("GEOBATCH_BATCH_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.batch.max_attempts = attempts;
        }
    }
    if let Ok(val) = std::env::var("GEOBATCH_BATCH_INITIAL_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.batch.initial_delay_ms = delay;
        }
    }

    // Provider overrides
    if let Ok(val) = std::env::var("GEOBATCH_PROVIDERS_PRIMARY") {
        config.providers.primary = val;
    }
    if let Ok(val) = std::env::var("GEOBATCH_PROVIDERS_SECONDARY") {
        config.providers.secondary = val;
    }
    if let Ok(val) = std::env::var("GEOBATCH_PROVIDERS_ARCGIS_BASE_URL") {
        config.providers.arcgis.base_url = val;
    }
    if let Ok(val) = std::env::var("GEOBATCH_PROVIDERS_ARCGIS_API_KEY") {
        config.providers.arcgis.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("GEOBATCH_PROVIDERS_KOMOOT_BASE_URL") {
        config.providers.komoot.base_url = val;
    }

    // HTTP overrides
    if let Ok(val) = std::env::var("GEOBATCH_HTTP_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.http.timeout_seconds = timeout;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("GEOBATCH_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("GEOBATCH_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
