//! Named-transform lookup table
//!
//! The pipeline engine addresses transforms by name and passes them plain
//! structured data: an input value plus a mapping of keyword arguments.
//! Each transform module contributes its entries through [`FilterModule`].

use crate::changes::ChangeAnalysisFilters;
use crate::error::format_error_chain;
use crate::flatten::ConfFlattenFilters;
use crate::logging::{sanitize_for_logging, LogGuard};
use crate::{FilterError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Name of the configuration flatten transform
pub const SPLUNK_CONF_FLATTEN: &str = "splunk_conf_flatten";

/// Name of the change analysis transform
pub const ANALYZE_SPLUNK_CHANGES: &str = "analyze_splunk_changes";

/// Callable behind a filter: `(input, kwargs) -> output`
pub type FilterFn = Arc<dyn Fn(&Value, &Value) -> Result<Value> + Send + Sync>;

/// A named transform
#[derive(Clone)]
pub struct Filter {
    pub name: String,
    pub description: String,
    func: FilterFn,
}

impl Filter {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Arc::new(func),
        }
    }

    /// Run the transform
    pub fn apply(&self, input: &Value, kwargs: &Value) -> Result<Value> {
        (self.func)(input, kwargs)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A group of filters registered together
pub trait FilterModule {
    fn filters(&self) -> Vec<Filter>;
}

/// Filters keyed by name
#[derive(Clone, Debug)]
pub struct FilterRegistry {
    filters: HashMap<String, Filter>,
}

impl FilterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Registry holding `splunk_conf_flatten` and `analyze_splunk_changes`
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_module(&ConfFlattenFilters);
        registry.register_module(&ChangeAnalysisFilters);
        registry
    }

    /// Register a filter, replacing any filter with the same name
    pub fn register(&mut self, filter: Filter) {
        self.filters.insert(filter.name.clone(), filter);
    }

    /// Register every filter of a module
    pub fn register_module(&mut self, module: &dyn FilterModule) {
        for filter in module.filters() {
            self.register(filter);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names, sorted
    pub fn filter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.filters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run the filter registered under `name`
    pub fn invoke(&self, name: &str, input: &Value, kwargs: &Value) -> Result<Value> {
        let filter = self.get(name).ok_or_else(|| FilterError::UnknownFilter {
            name: name.to_string(),
            available: self.filter_names().join(", "),
        })?;

        let _guard = LogGuard::new(format!("filter {}", name));
        filter.apply(input, kwargs).map_err(|e| {
            warn!(
                filter = name,
                error = %sanitize_for_logging(&format_error_chain(&e)),
                "Filter failed"
            );
            e
        })
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
