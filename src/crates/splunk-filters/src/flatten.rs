//! Flatten nested configuration groups into discrete settings
//!
//! A configuration group describes one file as a list of sections, each with
//! a list of options. Apply steps work one key at a time, so the nesting is
//! unrolled into a flat list of [`FlatSetting`]s.
//!
//! Output order is depth first: group order, then section order, then option
//! order. Re-applying the list in order is idempotent, and callers rely on
//! that order being stable between runs.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use splunk_filters::splunk_conf_flatten;
//!
//! let settings = splunk_conf_flatten(&json!([{
//!     "filepath": "/opt/splunk/etc/system/local",
//!     "filename": "server.conf",
//!     "sections": [{
//!         "section": "general",
//!         "options": [
//!             {"option": "serverName", "value": "my-splunk-server"},
//!             {"option": "pass4SymmKey", "value": "$7$encrypted", "state": "present"}
//!         ]
//!     }]
//! }]))
//! .unwrap();
//!
//! assert_eq!(settings.len(), 2);
//! assert_eq!(settings[0].path, "/opt/splunk/etc/system/local/server.conf");
//! assert_eq!(settings[1].option.as_deref(), Some("pass4SymmKey"));
//! ```

use crate::logging::redact_value;
use crate::model::{ConfGroup, FlatSetting};
use crate::registry::{Filter, FilterModule, SPLUNK_CONF_FLATTEN};
use crate::{FilterError, InputFault, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

/// Registers `splunk_conf_flatten`
pub struct ConfFlattenFilters;

impl FilterModule for ConfFlattenFilters {
    fn filters(&self) -> Vec<Filter> {
        vec![Filter::new(
            SPLUNK_CONF_FLATTEN,
            "Flatten Splunk configuration groups into a list of individual settings",
            |conf_groups, kwargs| {
                reject_kwargs(kwargs)?;
                let settings = splunk_conf_flatten(conf_groups)?;
                Ok(serde_json::to_value(settings)?)
            },
        )]
    }
}

fn reject_kwargs(kwargs: &Value) -> Result<()> {
    let argument = match kwargs {
        Value::Null => return Ok(()),
        Value::Object(map) => match map.keys().next() {
            None => return Ok(()),
            Some(key) => key.clone(),
        },
        _ => "kwargs".to_string(),
    };

    Err(FilterError::InvalidArgument {
        filter: SPLUNK_CONF_FLATTEN.to_string(),
        argument,
        reason: "filter takes no keyword arguments".to_string(),
    })
}

/// Flatten structured configuration data as handed over by the pipeline
///
/// Any structural problem fails the whole call with
/// [`FilterError::Flatten`]; no partial list is returned.
pub fn splunk_conf_flatten(conf_groups: &Value) -> Result<Vec<FlatSetting>> {
    let groups = decode_groups(conf_groups).map_err(FilterError::Flatten)?;
    flatten(&groups)
}

fn decode_groups(conf_groups: &Value) -> std::result::Result<Vec<ConfGroup>, InputFault> {
    let items = conf_groups.as_array().ok_or_else(|| InputFault::NotAList {
        location: "conf_groups".to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            ConfGroup::deserialize(item)
                .map_err(|e| InputFault::decode(format!("conf_groups[{}]", index), e))
        })
        .collect()
}

/// Flatten typed configuration groups
///
/// Sections named `""` are skipped. A group that contributes at least one
/// setting must carry both `filepath` and `filename`; they are joined with a
/// single `/` and otherwise left alone.
pub fn flatten(groups: &[ConfGroup]) -> Result<Vec<FlatSetting>> {
    let mut flattened = Vec::new();
    let mut skipped_sections = 0usize;

    for (index, group) in groups.iter().enumerate() {
        let emits = group
            .sections
            .iter()
            .any(|section| !section.is_placeholder() && !section.options.is_empty());
        if !emits {
            skipped_sections += group.sections.iter().filter(|s| s.is_placeholder()).count();
            continue;
        }

        let path = group_path(index, group).map_err(FilterError::Flatten)?;

        for section in &group.sections {
            if section.is_placeholder() {
                skipped_sections += 1;
                continue;
            }

            for option in &section.options {
                trace!(
                    path = %path,
                    section = section.section.as_deref().unwrap_or("null"),
                    option = option.option.as_deref().unwrap_or("null"),
                    value = %redact_value(option.option.as_deref(), option.value.as_ref()),
                    state = option.state.as_deref().unwrap_or("null"),
                    "flattened setting"
                );

                flattened.push(FlatSetting {
                    path: path.clone(),
                    section: section.section.clone(),
                    option: option.option.clone(),
                    value: option.value.clone(),
                    state: option.state.clone(),
                    comment: option.comment.clone(),
                });
            }
        }
    }

    debug!(
        groups = groups.len(),
        settings = flattened.len(),
        skipped_sections,
        "Flattened configuration groups"
    );

    Ok(flattened)
}

fn group_path(index: usize, group: &ConfGroup) -> std::result::Result<String, InputFault> {
    let location = || format!("conf_groups[{}]", index);
    let filepath = group
        .filepath
        .as_deref()
        .ok_or_else(|| InputFault::missing(location(), "filepath"))?;
    let filename = group
        .filename
        .as_deref()
        .ok_or_else(|| InputFault::missing(location(), "filename"))?;

    Ok(format!("{}/{}", filepath, filename))
}
