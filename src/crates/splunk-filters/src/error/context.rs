//! Error chain utilities
//!
//! Walks `source()` chains so a wrapped input fault can be reported in full
//! or reduced to the fault that started it.

use std::error::Error as StdError;

/// Format an error chain as a multi-line string
///
/// The top-level error is printed first, then one indented `Caused by:` line
/// per source.
///
/// # Example
///
/// ```rust
/// use splunk_filters::error::{format_error_chain, FilterError, InputFault};
///
/// let err = FilterError::Flatten(InputFault::NotAList {
///     location: "conf_groups".into(),
/// });
/// assert_eq!(
///     format_error_chain(&err),
///     "Error: Error flattening configuration data: conf_groups is not a list\n  \
///      Caused by: conf_groups is not a list"
/// );
/// ```
pub fn format_error_chain(error: &dyn StdError) -> String {
    let mut result = format!("Error: {}", error);
    let mut current = error.source();
    let mut level = 1;

    while let Some(source) = current {
        result.push_str(&format!("\n{:indent$}Caused by: {}", "", source, indent = level * 2));
        current = source.source();
        level += 1;
    }

    result
}

/// Get the root cause of an error chain
pub fn root_cause(error: &dyn StdError) -> &dyn StdError {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current
}

/// Count the number of errors in an error chain (minimum 1)
pub fn error_chain_length(error: &dyn StdError) -> usize {
    let mut count = 1;
    let mut current = error.source();

    while let Some(source) = current {
        count += 1;
        current = source.source();
    }

    count
}
