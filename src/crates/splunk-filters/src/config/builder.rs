//! Configuration builder trait
//!
//! Common shape for configuration structures: defaults, validation,
//! environment loading and merging of several sources.

use crate::Result;

/// Trait for configuration structures that support building, validation, and merging
///
/// # Example
///
/// ```rust
/// use splunk_filters::config::ConfigBuilder;
///
/// #[derive(Clone, Default)]
/// struct PushConfig {
///     pub force: bool,
/// }
///
/// impl ConfigBuilder for PushConfig {
///     fn from_env(prefix: &str) -> splunk_filters::Result<Self> {
///         let key = splunk_filters::config::build_env_key(prefix, "force");
///         Ok(Self {
///             force: splunk_filters::config::get_env_bool(&key)?.unwrap_or(false),
///         })
///     }
///
///     fn merge(&mut self, other: Self) -> &mut Self {
///         self.force |= other.force;
///         self
///     }
/// }
///
/// let config = PushConfig::build().unwrap();
/// assert!(!config.force);
/// ```
pub trait ConfigBuilder: Default + Clone {
    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Load configuration from environment variables
    ///
    /// Variables follow the pattern `{PREFIX}{FIELD_NAME}` where FIELD_NAME
    /// is the uppercased field name.
    fn from_env(prefix: &str) -> Result<Self>;

    /// Merge another configuration into this one
    ///
    /// Returns self for chaining.
    fn merge(&mut self, other: Self) -> &mut Self;

    /// Create, validate, and return the default configuration
    fn build() -> Result<Self> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load from environment, merge defaults, and validate
    fn from_env_with_defaults(prefix: &str) -> Result<Self> {
        let mut config = Self::from_env(prefix)?;
        let defaults = Self::default();
        config.merge(defaults);
        config.validate()?;
        Ok(config)
    }
}
