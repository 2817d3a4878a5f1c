//! Configuration management utilities
//!
//! - `ConfigBuilder` trait for configuration structures that load from the
//!   environment, merge and validate
//! - Environment variable helpers with strict boolean parsing
//!
//! # Example
//!
//! ```rust
//! use splunk_filters::config::ConfigBuilder;
//! use splunk_filters::AnalyzeOptions;
//!
//! std::env::set_var("DOCTEST_FORCE_BUNDLE_PUSH", "yes");
//! let options = AnalyzeOptions::from_env_with_defaults("DOCTEST_").unwrap();
//! assert!(options.force_bundle_push);
//! assert!(!options.rolling_restart_pending);
//! std::env::remove_var("DOCTEST_FORCE_BUNDLE_PUSH");
//! ```

mod builder;
mod env;

pub use builder::ConfigBuilder;
pub use env::{build_env_key, get_env, get_env_bool};
