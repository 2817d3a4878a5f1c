//! Environment variable loading utilities

use crate::{FilterError, Result};
use std::env;

/// Load an environment variable as a string
///
/// * `Ok(Some(value))` if variable exists
/// * `Ok(None)` if variable doesn't exist
/// * `Err` if variable exists but has invalid UTF-8
pub fn get_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(FilterError::Config(format!(
            "Environment variable {} contains invalid UTF-8",
            key
        ))),
    }
}

/// Load a boolean environment variable
///
/// Recognizes: "true", "1", "yes", "on" (case-insensitive) as true
/// Recognizes: "false", "0", "no", "off" (case-insensitive) as false
///
/// * `Ok(Some(bool))` if variable exists and is a valid boolean
/// * `Ok(None)` if variable doesn't exist
/// * `Err` if variable exists but is not a valid boolean
pub fn get_env_bool(key: &str) -> Result<Option<bool>> {
    match get_env(key)? {
        Some(val) => {
            let lower = val.trim().to_lowercase();
            let result = match lower.as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => {
                    return Err(FilterError::Config(format!(
                        "Invalid boolean value for {}: {}",
                        key, val
                    )))
                }
            };
            Ok(Some(result))
        }
        None => Ok(None),
    }
}

/// Build a prefixed environment variable name
///
/// ```rust
/// use splunk_filters::config::build_env_key;
///
/// assert_eq!(
///     build_env_key("SPLUNK_FILTERS_", "force_bundle_push"),
///     "SPLUNK_FILTERS_FORCE_BUNDLE_PUSH"
/// );
/// ```
pub fn build_env_key(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name.to_uppercase())
}
