//! Path rules mapping a changed file to its follow-up action
//!
//! Rules are evaluated top-down and the first match wins, so each changed
//! file implies at most one action. The order matters: anything under
//! `/etc/` needs a splunkd restart unless it lives in one of the staging
//! directories that are distributed by another component.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directories under `etc/` whose contents are pushed elsewhere instead of
/// being read by the local splunkd
pub const STAGING_DIRS: [&str; 4] = ["deployment-apps", "shcluster", "master-apps", "manager-apps"];

const ETC_SEGMENT: &str = "/etc/";

/// Follow-up action implied by a changed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// Restart the local splunkd
    SplunkdRestart,
    /// Reload the deployment server
    DeploymentServerReload,
    /// Push the search head cluster bundle from the deployer
    DeployerPush,
    /// Push the indexer cluster bundle from the cluster manager
    ClusterManagerPush,
}

impl ChangeAction {
    /// Name of the action flag this action sets
    pub fn flag_name(&self) -> &'static str {
        match self {
            Self::SplunkdRestart => "splunkd_restart_pending",
            Self::DeploymentServerReload => "deploymentserver_reload",
            Self::DeployerPush => "deployer_push",
            Self::ClusterManagerPush => "cluster_manager_push",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_name())
    }
}

/// How a rule inspects a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatcher {
    /// Some `/etc/` segment is followed by a suffix that does not start with
    /// any of the listed directory names
    EtcExcept(&'static [&'static str]),
    /// The path contains any of the listed substrings
    ContainsAny(&'static [&'static str]),
}

impl PathMatcher {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::EtcExcept(excluded) => etc_outside(path, excluded),
            Self::ContainsAny(needles) => needles.iter().any(|needle| path.contains(needle)),
        }
    }
}

/// Every `/etc/` occurrence is a candidate, not just the first. The suffix
/// after the candidate must stay on one line; a single trailing newline is
/// tolerated.
fn etc_outside(path: &str, excluded: &[&str]) -> bool {
    path.match_indices(ETC_SEGMENT).any(|(start, segment)| {
        let suffix = &path[start + segment.len()..];
        let line = suffix.strip_suffix('\n').unwrap_or(suffix);

        !line.contains('\n') && !excluded.iter().any(|dir| suffix.starts_with(dir))
    })
}

/// One entry of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRule {
    pub action: ChangeAction,
    pub matcher: PathMatcher,
}

impl ChangeRule {
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// Rule table in priority order
pub const CHANGE_RULES: [ChangeRule; 4] = [
    ChangeRule {
        action: ChangeAction::SplunkdRestart,
        matcher: PathMatcher::EtcExcept(&STAGING_DIRS),
    },
    ChangeRule {
        action: ChangeAction::DeploymentServerReload,
        matcher: PathMatcher::ContainsAny(&["deployment-apps"]),
    },
    ChangeRule {
        action: ChangeAction::DeployerPush,
        matcher: PathMatcher::ContainsAny(&["shcluster"]),
    },
    ChangeRule {
        action: ChangeAction::ClusterManagerPush,
        matcher: PathMatcher::ContainsAny(&["master-apps", "manager-apps"]),
    },
];

/// Action implied by a changed path, if any
///
/// # Example
///
/// ```rust
/// use splunk_filters::changes::rules::{classify_path, ChangeAction};
///
/// assert_eq!(
///     classify_path("/opt/splunk/etc/system/local/server.conf"),
///     Some(ChangeAction::SplunkdRestart)
/// );
/// assert_eq!(
///     classify_path("/opt/splunk/etc/manager-apps/_cluster/local/indexes.conf"),
///     Some(ChangeAction::ClusterManagerPush)
/// );
/// assert_eq!(classify_path("/tmp/inputs.conf"), None);
/// ```
pub fn classify_path(path: &str) -> Option<ChangeAction> {
    CHANGE_RULES
        .iter()
        .find(|rule| rule.matches(path))
        .map(|rule| rule.action)
}
