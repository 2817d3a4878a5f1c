//! Logging utilities
//!
//! Helpers for structured logging with tracing. The crate never installs a
//! subscriber; the host pipeline decides where these events go.
//!
//! Flattened settings routinely carry credentials (`pass4SymmKey`,
//! `sslPassword`, ...), so values are passed through [`redact_value`] before
//! they reach a log line.

use serde_json::Value;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// Placeholder written in place of secret values
pub const REDACTED: &str = "[REDACTED]";

/// RAII guard for logging scope entry and exit
///
/// # Example
///
/// ```rust
/// use splunk_filters::logging::LogGuard;
///
/// fn apply_settings() {
///     let _guard = LogGuard::new("apply_settings");
///     // Guard will log exit when dropped
/// }
/// ```
pub struct LogGuard {
    name: String,
    start: Instant,
}

impl LogGuard {
    /// Create a new log guard
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!("Entering: {}", name);

        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Get elapsed time since guard creation
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        debug!(
            "Exiting: {} (elapsed: {})",
            self.name,
            format_duration(self.start.elapsed())
        );
    }
}

/// Format duration in human-readable form
///
/// # Example
///
/// ```rust
/// use splunk_filters::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
/// assert_eq!(format_duration(Duration::from_micros(500)), "500μs");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1000)
    } else if micros < 60_000_000 {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    } else {
        let seconds = micros / 1_000_000;
        let minutes = seconds / 60;
        let secs = seconds % 60;
        format!("{}m{}s", minutes, secs)
    }
}

fn secret_option_pattern() -> Option<&'static regex::Regex> {
    static PATTERN: OnceLock<Option<regex::Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            regex::Regex::new(
                r"(?i)(pass4symmkey|password|passwd|secret|token|privatekey|api[_-]?key)",
            )
            .ok()
        })
        .as_ref()
}

/// Whether an option name is known to hold a credential
///
/// # Example
///
/// ```rust
/// use splunk_filters::logging::is_secret_option;
///
/// assert!(is_secret_option("pass4SymmKey"));
/// assert!(is_secret_option("sslPassword"));
/// assert!(!is_secret_option("serverName"));
/// ```
pub fn is_secret_option(option: &str) -> bool {
    secret_option_pattern().is_some_and(|re| re.is_match(option))
}

/// Value of a setting as it may appear in a log line
///
/// Secret-bearing options and Splunk-encrypted values (`$7$...`, `$1$...`)
/// are replaced with [`REDACTED`].
pub fn redact_value(option: Option<&str>, value: Option<&Value>) -> String {
    let Some(value) = value else {
        return "null".to_string();
    };

    let encrypted = value
        .as_str()
        .is_some_and(|s| s.starts_with("$7$") || s.starts_with("$1$"));

    if encrypted || option.is_some_and(is_secret_option) {
        REDACTED.to_string()
    } else {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Sanitize free text for logging
///
/// Replaces `name = value` and `name: value` pairs whose name looks like a
/// credential with redacted markers.
///
/// # Example
///
/// ```rust
/// use splunk_filters::logging::sanitize_for_logging;
///
/// let sanitized = sanitize_for_logging("pass4SymmKey = changeme");
/// assert!(sanitized.contains("[REDACTED]"));
/// assert!(!sanitized.contains("changeme"));
/// ```
pub fn sanitize_for_logging(input: &str) -> String {
    let mut result = input.to_string();

    let patterns = [
        (r"(?i)(pass4symmkey)\s*[:=]\s*\S+", "$1 = [REDACTED]"),
        (r"(?i)(\w*password|passwd|pwd)\s*[:=]\s*\S+", "$1 = [REDACTED]"),
        (r"(?i)(token)\s*[:=]\s*\S+", "$1 = [REDACTED]"),
        (r"(?i)(secret)\s*[:=]\s*\S+", "$1 = [REDACTED]"),
        (r"\$[17]\$\S+", "[REDACTED]"),
    ];

    for (pattern, replacement) in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            result = re.replace_all(&result, *replacement).to_string();
        }
    }

    result
}
