//! Typed records exchanged with the pipeline
//!
//! Input records decode from the loosely shaped mappings the pipeline passes
//! around. Optional keys are modeled as `Option` and defaults are applied
//! here, at decode time, so the transforms never deal with missing keys
//! beyond the ones that are genuinely optional in the output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State assigned to an option that does not name one
pub const DEFAULT_STATE: &str = "present";

fn default_state() -> Option<String> {
    Some(DEFAULT_STATE.to_string())
}

fn default_comment() -> Option<String> {
    Some(String::new())
}

/// One target configuration file with its sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfGroup {
    /// Directory holding the file
    #[serde(default)]
    pub filepath: Option<String>,
    /// File name within `filepath`
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub sections: Vec<ConfSection>,
}

impl ConfGroup {
    /// Create a group for `filepath/filename` with no sections
    pub fn new(filepath: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            filepath: Some(filepath.into()),
            filename: Some(filename.into()),
            sections: Vec::new(),
        }
    }

    /// Append a section
    pub fn with_section(mut self, section: ConfSection) -> Self {
        self.sections.push(section);
        self
    }
}

/// Named stanza inside a configuration file
///
/// A section named `""` is a placeholder and never produces settings. Its
/// options are not decoded at all, so they may hold anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct ConfSection {
    pub section: Option<String>,
    pub options: Vec<ConfOption>,
}

impl ConfSection {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            options: Vec::new(),
        }
    }

    /// Append an option
    pub fn with_option(mut self, option: ConfOption) -> Self {
        self.options.push(option);
        self
    }

    /// Whether this section is the empty-name placeholder
    pub fn is_placeholder(&self) -> bool {
        self.section.as_deref() == Some("")
    }
}

#[derive(Deserialize)]
struct RawSection {
    #[serde(default)]
    section: Option<String>,
    #[serde(default = "empty_options")]
    options: Value,
}

fn empty_options() -> Value {
    Value::Array(Vec::new())
}

impl TryFrom<RawSection> for ConfSection {
    type Error = serde_json::Error;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        let options = if raw.section.as_deref() == Some("") {
            Vec::new()
        } else {
            serde_json::from_value(raw.options)?
        };

        Ok(Self {
            section: raw.section,
            options,
        })
    }
}

/// Single key within a section
///
/// `state` and `comment` default only when the key is absent; an explicit
/// null is kept as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfOption {
    #[serde(default)]
    pub option: Option<String>,
    /// Passed through untouched; YAML inputs may carry numbers or booleans
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default = "default_state")]
    pub state: Option<String>,
    #[serde(default = "default_comment")]
    pub comment: Option<String>,
}

impl ConfOption {
    /// Create a present option with no comment
    pub fn new(option: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            option: Some(option.into()),
            value: Some(value.into()),
            state: default_state(),
            comment: default_comment(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// One flattened setting, ready for a per-key apply step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatSetting {
    /// `filepath + "/" + filename`, unnormalized
    pub path: String,
    pub section: Option<String>,
    pub option: Option<String>,
    pub value: Option<Value>,
    pub state: Option<String>,
    pub comment: Option<String>,
}

/// Result of one upstream configuration step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub changed: bool,
    #[serde(default)]
    pub path: String,
}

impl ChangeRecord {
    pub fn new(changed: bool, path: impl Into<String>) -> Self {
        Self {
            changed,
            path: path.into(),
        }
    }

    pub fn changed(path: impl Into<String>) -> Self {
        Self::new(true, path)
    }

    pub fn unchanged(path: impl Into<String>) -> Self {
        Self::new(false, path)
    }
}

/// Follow-up actions implied by a batch of changes
///
/// The four base flags always serialize. `splunkd_restart` is only present
/// when a rolling restart was requested; downstream steps test for the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    pub splunkd_restart_pending: bool,
    pub deploymentserver_reload: bool,
    pub deployer_push: bool,
    pub cluster_manager_push: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunkd_restart: Option<bool>,
}

impl ActionSet {
    /// Whether any follow-up action is required
    pub fn any(&self) -> bool {
        self.splunkd_restart_pending
            || self.deploymentserver_reload
            || self.deployer_push
            || self.cluster_manager_push
            || self.splunkd_restart == Some(true)
    }
}
