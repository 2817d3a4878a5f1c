//! Error types for the filter transforms
//!
//! Every public entry point reports failure through [`FilterError`]. Faults in
//! the caller-supplied data are described by [`InputFault`] and wrapped in the
//! variant belonging to the transform that hit them, so the caller sees one
//! error type per transform regardless of what went wrong underneath.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use splunk_filters::error::{format_error_chain, root_cause};
//! use splunk_filters::splunk_conf_flatten;
//!
//! let err = splunk_conf_flatten(&json!({"not": "a list"})).unwrap_err();
//! assert!(err.to_string().starts_with("Error flattening configuration data:"));
//!
//! let chain = format_error_chain(&err);
//! assert!(chain.contains("Caused by:"));
//! assert!(!root_cause(&err).to_string().is_empty());
//! ```

mod context;

pub use context::{error_chain_length, format_error_chain, root_cause};

use thiserror::Error;

/// Errors returned by the filter transforms and the registry
#[derive(Debug, Error)]
pub enum FilterError {
    /// Structural fault while flattening configuration groups
    #[error("Error flattening configuration data: {0}")]
    Flatten(#[source] InputFault),

    /// Structural fault while analyzing change results
    #[error("Error analyzing configuration changes: {0}")]
    Classification(#[source] InputFault),

    /// Keyword argument rejected by a filter
    #[error("Invalid argument '{argument}' for filter '{filter}': {reason}")]
    InvalidArgument {
        filter: String,
        argument: String,
        reason: String,
    },

    /// No filter registered under the requested name
    #[error("Filter '{name}' not found. Available filters: {available}")]
    UnknownFilter { name: String, available: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Encoding a result back into structured data failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fault found in caller-supplied structured data
#[derive(Debug, Error)]
pub enum InputFault {
    /// The data did not decode into the expected record shape
    #[error("{location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required key is absent
    #[error("{location} is missing required key '{field}'")]
    MissingField { location: String, field: String },

    /// A key holds a value of the wrong type
    #[error("{location} has '{field}' of the wrong type, expected {expected}")]
    TypeMismatch {
        location: String,
        field: String,
        expected: String,
    },

    /// A list was expected
    #[error("{location} is not a list")]
    NotAList { location: String },
}

impl InputFault {
    pub(crate) fn decode(location: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            location: location.into(),
            source,
        }
    }

    pub(crate) fn missing(location: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            location: location.into(),
            field: field.into(),
        }
    }

    pub(crate) fn mismatch(
        location: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            location: location.into(),
            field: field.into(),
            expected: expected.into(),
        }
    }
}
