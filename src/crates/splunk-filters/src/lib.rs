//! Splunk configuration transforms for deployment pipelines
//!
//! This crate provides the data transforms a Splunk configuration-management
//! pipeline calls between its own steps. Each transform takes plain
//! structured data (the shape an automation engine hands around) and returns
//! plain structured data.
//!
//! # Modules
//!
//! - `flatten` - Flatten nested configuration groups into discrete settings
//! - `changes` - Classify change results into follow-up actions
//! - `options` - Flags controlling change analysis
//! - `registry` - Named-transform lookup table
//! - `model` - Typed input and output records
//! - `config` - Configuration builder trait and environment loading
//! - `error` - Domain errors and error chain formatting
//! - `logging` - Scope timing and secret redaction for log output
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use splunk_filters::FilterRegistry;
//!
//! let registry = FilterRegistry::builtin();
//!
//! let actions = registry
//!     .invoke(
//!         "analyze_splunk_changes",
//!         &json!([
//!             {"changed": true, "path": "/opt/splunk/etc/system/local/server.conf"},
//!             {"changed": false, "path": "/opt/splunk/etc/shcluster/apps/app/local/props.conf"}
//!         ]),
//!         &json!({"force_bundle_push": false}),
//!     )
//!     .unwrap();
//!
//! assert_eq!(actions["splunkd_restart_pending"], json!(true));
//! assert_eq!(actions["deployer_push"], json!(false));
//! ```

pub mod changes;
pub mod config;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod model;
pub mod options;
pub mod registry;

pub use changes::{analyze, analyze_splunk_changes, ChangeAnalyzer};
pub use error::{FilterError, InputFault};
pub use flatten::{flatten, splunk_conf_flatten};
pub use model::{ActionSet, ChangeRecord, ConfGroup, ConfOption, ConfSection, FlatSetting};
pub use options::AnalyzeOptions;
pub use registry::{Filter, FilterModule, FilterRegistry};

/// Result type for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
