//! Result type alias for geobatch
//!
//! This module provides a convenient Result type alias that uses GeobatchError
//! as the error type.

use super::errors::GeobatchError;

/// Result type alias for geobatch operations
///
/// # Examples
///
/// ```
/// use geobatch::domain::result::Result;
/// use geobatch::domain::errors::GeobatchError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GeobatchError::Input("Malformed row".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GeobatchError>;
