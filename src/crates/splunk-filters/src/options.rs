//! Flags controlling change analysis
//!
//! The four flags seed the action set before any change result is looked at.
//! They arrive either as keyword arguments from the pipeline, from the
//! environment, or through the builder methods.

use crate::config::{build_env_key, get_env_bool, ConfigBuilder};
use crate::registry::ANALYZE_SPLUNK_CHANGES;
use crate::{FilterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Environment prefix used by hosts that load options from the environment
pub const DEFAULT_ENV_PREFIX: &str = "SPLUNK_FILTERS_";

const ROLLING_RESTART_PENDING: &str = "rolling_restart_pending";
const SPLUNKD_RESTART_PENDING: &str = "splunkd_restart_pending";
const FORCE_SPLUNKD_RESTART: &str = "force_splunkd_restart";
const FORCE_BUNDLE_PUSH: &str = "force_bundle_push";

/// Options for [`analyze_splunk_changes`](crate::analyze_splunk_changes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// A rolling restart is already pending; adds `splunkd_restart` to the result
    #[serde(default)]
    pub rolling_restart_pending: bool,
    /// A splunkd restart is already pending
    #[serde(default)]
    pub splunkd_restart_pending: bool,
    /// Restart splunkd regardless of changes
    #[serde(default)]
    pub force_splunkd_restart: bool,
    /// Push the deployer bundle regardless of changes
    #[serde(default)]
    pub force_bundle_push: bool,
}

impl AnalyzeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolling_restart_pending(mut self, pending: bool) -> Self {
        self.rolling_restart_pending = pending;
        self
    }

    pub fn with_splunkd_restart_pending(mut self, pending: bool) -> Self {
        self.splunkd_restart_pending = pending;
        self
    }

    pub fn with_force_splunkd_restart(mut self, force: bool) -> Self {
        self.force_splunkd_restart = force;
        self
    }

    pub fn with_force_bundle_push(mut self, force: bool) -> Self {
        self.force_bundle_push = force;
        self
    }

    /// Parse keyword arguments passed alongside the change results
    ///
    /// `null` means no arguments. Unknown keys and non-boolean values are
    /// rejected rather than ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use splunk_filters::AnalyzeOptions;
    ///
    /// let options = AnalyzeOptions::from_args(&json!({"force_bundle_push": true})).unwrap();
    /// assert!(options.force_bundle_push);
    ///
    /// assert!(AnalyzeOptions::from_args(&json!({"force_push": true})).is_err());
    /// ```
    pub fn from_args(args: &Value) -> Result<Self> {
        let map = match args {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => {
                return Err(invalid_argument(
                    "kwargs",
                    "keyword arguments must be a mapping",
                ))
            }
        };

        let mut options = Self::default();
        for (key, value) in map {
            let flag = value.as_bool().ok_or_else(|| {
                invalid_argument(key, format!("expected a boolean, got {}", value))
            })?;

            match key.as_str() {
                ROLLING_RESTART_PENDING => options.rolling_restart_pending = flag,
                SPLUNKD_RESTART_PENDING => options.splunkd_restart_pending = flag,
                FORCE_SPLUNKD_RESTART => options.force_splunkd_restart = flag,
                FORCE_BUNDLE_PUSH => options.force_bundle_push = flag,
                _ => return Err(invalid_argument(key, "unknown keyword argument")),
            }
        }

        Ok(options)
    }
}

fn invalid_argument(argument: &str, reason: impl Into<String>) -> FilterError {
    FilterError::InvalidArgument {
        filter: ANALYZE_SPLUNK_CHANGES.to_string(),
        argument: argument.to_string(),
        reason: reason.into(),
    }
}

impl ConfigBuilder for AnalyzeOptions {
    fn from_env(prefix: &str) -> Result<Self> {
        let flag = |name: &str| -> Result<bool> {
            Ok(get_env_bool(&build_env_key(prefix, name))?.unwrap_or(false))
        };

        Ok(Self {
            rolling_restart_pending: flag(ROLLING_RESTART_PENDING)?,
            splunkd_restart_pending: flag(SPLUNKD_RESTART_PENDING)?,
            force_splunkd_restart: flag(FORCE_SPLUNKD_RESTART)?,
            force_bundle_push: flag(FORCE_BUNDLE_PUSH)?,
        })
    }

    /// Flags are sticky: a flag set on either side stays set.
    fn merge(&mut self, other: Self) -> &mut Self {
        self.rolling_restart_pending |= other.rolling_restart_pending;
        self.splunkd_restart_pending |= other.splunkd_restart_pending;
        self.force_splunkd_restart |= other.force_splunkd_restart;
        self.force_bundle_push |= other.force_bundle_push;
        self
    }
}
