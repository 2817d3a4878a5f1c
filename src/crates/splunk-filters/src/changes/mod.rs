//! Classify configuration change results into follow-up actions
//!
//! Each upstream configuration step reports whether it changed a file and
//! which one. The results are folded into one [`ActionSet`] telling the
//! pipeline which restarts, reloads and bundle pushes to run.
//!
//! The fold starts from the caller's [`AnalyzeOptions`] and only ever turns
//! flags on, so the order of results never changes the outcome.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use splunk_filters::{analyze_splunk_changes, AnalyzeOptions};
//!
//! let results = json!([
//!     {"changed": true, "path": "/opt/splunk/etc/system/local/server.conf"},
//!     {"changed": true, "path": "/opt/splunk/etc/deployment-apps/my_app/local/inputs.conf"},
//!     {"changed": false, "path": "/opt/splunk/etc/apps/search/local/props.conf"}
//! ]);
//!
//! let options = AnalyzeOptions::new().with_rolling_restart_pending(true);
//! let actions = analyze_splunk_changes(&results, &options).unwrap();
//!
//! assert!(actions.splunkd_restart_pending);
//! assert!(actions.deploymentserver_reload);
//! assert!(!actions.deployer_push);
//! assert_eq!(actions.splunkd_restart, Some(true));
//! ```

pub mod rules;

use crate::model::{ActionSet, ChangeRecord};
use crate::registry::{Filter, FilterModule, ANALYZE_SPLUNK_CHANGES};
use crate::{AnalyzeOptions, FilterError, InputFault, Result};
use serde_json::Value;
use tracing::debug;

pub use rules::{classify_path, ChangeAction, ChangeRule, PathMatcher, CHANGE_RULES};

/// Registers `analyze_splunk_changes`
pub struct ChangeAnalysisFilters;

impl FilterModule for ChangeAnalysisFilters {
    fn filters(&self) -> Vec<Filter> {
        vec![Filter::new(
            ANALYZE_SPLUNK_CHANGES,
            "Analyze Splunk configuration changes and determine required actions",
            |results, kwargs| {
                let options = AnalyzeOptions::from_args(kwargs)?;
                let actions = analyze_splunk_changes(results, &options)?;
                Ok(serde_json::to_value(actions)?)
            },
        )]
    }
}

/// Accumulator folding changed paths into an [`ActionSet`]
#[derive(Debug, Clone)]
pub struct ChangeAnalyzer {
    actions: ActionSet,
    classified: usize,
}

impl ChangeAnalyzer {
    /// Seed the action set from the caller's flags
    pub fn new(options: &AnalyzeOptions) -> Self {
        let actions = ActionSet {
            splunkd_restart_pending: options.force_splunkd_restart
                || options.splunkd_restart_pending,
            deploymentserver_reload: false,
            deployer_push: options.force_bundle_push,
            cluster_manager_push: false,
            splunkd_restart: options.rolling_restart_pending.then_some(true),
        };

        Self {
            actions,
            classified: 0,
        }
    }

    /// Record one changed path and return the action it implied
    pub fn observe(&mut self, path: &str) -> Option<ChangeAction> {
        let action = classify_path(path)?;
        self.classified += 1;

        match action {
            ChangeAction::SplunkdRestart => self.actions.splunkd_restart_pending = true,
            ChangeAction::DeploymentServerReload => self.actions.deploymentserver_reload = true,
            ChangeAction::DeployerPush => self.actions.deployer_push = true,
            ChangeAction::ClusterManagerPush => self.actions.cluster_manager_push = true,
        }

        debug!(path, action = %action, "Classified configuration change");
        Some(action)
    }

    /// Current state of the action set
    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    pub fn finish(self) -> ActionSet {
        debug!(
            classified = self.classified,
            splunkd_restart_pending = self.actions.splunkd_restart_pending,
            deploymentserver_reload = self.actions.deploymentserver_reload,
            deployer_push = self.actions.deployer_push,
            cluster_manager_push = self.actions.cluster_manager_push,
            rolling_restart = self.actions.splunkd_restart.is_some(),
            any_action = self.actions.any(),
            "Analyzed configuration changes"
        );
        self.actions
    }
}

/// Fold typed change records into an action set
///
/// Records that did not change are skipped.
pub fn analyze(records: &[ChangeRecord], options: &AnalyzeOptions) -> ActionSet {
    let mut analyzer = ChangeAnalyzer::new(options);
    for record in records.iter().filter(|record| record.changed) {
        analyzer.observe(&record.path);
    }
    analyzer.finish()
}

/// Fold structured change results as handed over by the pipeline
///
/// Every result must be a mapping with a boolean `changed` key; a missing
/// key is a fault, not `false`. `path` is only read from changed results and
/// defaults to `""` when absent. Faults fail the whole call with
/// [`FilterError::Classification`].
pub fn analyze_splunk_changes(results: &Value, options: &AnalyzeOptions) -> Result<ActionSet> {
    let items = results.as_array().ok_or_else(|| {
        FilterError::Classification(InputFault::NotAList {
            location: "results".to_string(),
        })
    })?;

    let mut analyzer = ChangeAnalyzer::new(options);
    for (index, item) in items.iter().enumerate() {
        if let Some(path) = changed_path(index, item).map_err(FilterError::Classification)? {
            analyzer.observe(path);
        }
    }

    Ok(analyzer.finish())
}

/// Path of a changed result, `None` for an unchanged one
fn changed_path(index: usize, item: &Value) -> std::result::Result<Option<&str>, InputFault> {
    let location = || format!("results[{}]", index);

    let record = item
        .as_object()
        .ok_or_else(|| InputFault::mismatch(location(), "result", "a mapping"))?;

    let changed = record
        .get("changed")
        .ok_or_else(|| InputFault::missing(location(), "changed"))?
        .as_bool()
        .ok_or_else(|| InputFault::mismatch(location(), "changed", "a boolean"))?;

    if !changed {
        return Ok(None);
    }

    match record.get("path") {
        None => Ok(Some("")),
        Some(Value::String(path)) => Ok(Some(path.as_str())),
        Some(_) => Err(InputFault::mismatch(location(), "path", "a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOCAL: &str = "/opt/splunk/etc/system/local/server.conf";
    const DEPLOYMENT_APP: &str = "/opt/splunk/etc/deployment-apps/my_app/local/inputs.conf";
    const SHCLUSTER_APP: &str = "/opt/splunk/etc/shcluster/apps/my_app/local/props.conf";
    const MANAGER_APP: &str = "/opt/splunk/etc/manager-apps/_cluster/local/indexes.conf";

    #[test]
    fn test_empty_results_reflect_options() {
        let cases = [
            (AnalyzeOptions::new(), false, false),
            (AnalyzeOptions::new().with_splunkd_restart_pending(true), true, false),
            (AnalyzeOptions::new().with_force_splunkd_restart(true), true, false),
            (AnalyzeOptions::new().with_force_bundle_push(true), false, true),
        ];

        for (options, restart, push) in cases {
            let actions = analyze(&[], &options);
            assert_eq!(
                actions,
                ActionSet {
                    splunkd_restart_pending: restart,
                    deploymentserver_reload: false,
                    deployer_push: push,
                    cluster_manager_push: false,
                    splunkd_restart: None,
                },
                "options: {:?}",
                options
            );
        }
    }

    #[test]
    fn test_rolling_restart_adds_key() {
        let actions = analyze(&[], &AnalyzeOptions::new().with_rolling_restart_pending(true));
        assert_eq!(actions.splunkd_restart, Some(true));

        let value = serde_json::to_value(&actions).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_local_change_sets_restart_only() {
        let actions = analyze(&[ChangeRecord::changed(LOCAL)], &AnalyzeOptions::default());
        assert_eq!(
            actions,
            ActionSet {
                splunkd_restart_pending: true,
                ..ActionSet::default()
            }
        );
    }

    #[test]
    fn test_deployment_app_change_sets_reload_only() {
        let actions = analyze(&[ChangeRecord::changed(DEPLOYMENT_APP)], &AnalyzeOptions::default());
        assert_eq!(
            actions,
            ActionSet {
                deploymentserver_reload: true,
                ..ActionSet::default()
            }
        );
    }

    #[test]
    fn test_unchanged_records_are_ignored() {
        let actions = analyze(&[ChangeRecord::unchanged(LOCAL)], &AnalyzeOptions::default());
        assert_eq!(actions, ActionSet::default());
    }

    #[test]
    fn test_actions_are_never_reset() {
        let records = [
            ChangeRecord::changed(SHCLUSTER_APP),
            ChangeRecord::changed("/tmp/unrelated.conf"),
            ChangeRecord::unchanged(SHCLUSTER_APP),
            ChangeRecord::changed(MANAGER_APP),
        ];

        let actions = analyze(&records, &AnalyzeOptions::default());
        assert!(actions.deployer_push);
        assert!(actions.cluster_manager_push);
        assert!(!actions.splunkd_restart_pending);
    }

    #[test]
    fn test_observe_reports_action() {
        let mut analyzer = ChangeAnalyzer::new(&AnalyzeOptions::default());
        assert_eq!(analyzer.observe(MANAGER_APP), Some(ChangeAction::ClusterManagerPush));
        assert_eq!(analyzer.observe("/var/tmp/x"), None);
        assert!(analyzer.actions().cluster_manager_push);
    }

    #[test]
    fn test_structured_results() {
        let actions = analyze_splunk_changes(
            &json!([
                {"changed": true, "path": SHCLUSTER_APP},
                {"changed": false, "path": LOCAL}
            ]),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert!(actions.deployer_push);
        assert!(!actions.splunkd_restart_pending);
    }

    #[test]
    fn test_missing_changed_is_a_fault() {
        let err = analyze_splunk_changes(&json!([{"path": LOCAL}]), &AnalyzeOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error analyzing configuration changes: results[0] is missing required key 'changed'"
        );
    }

    #[test]
    fn test_non_boolean_changed_is_a_fault() {
        let err = analyze_splunk_changes(
            &json!([{"changed": "yes", "path": LOCAL}]),
            &AnalyzeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FilterError::Classification(InputFault::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_path_on_changed_result_matches_nothing() {
        let results = json!([{"changed": true}]);
        let actions = analyze_splunk_changes(&results, &AnalyzeOptions::default()).unwrap();
        assert_eq!(actions, ActionSet::default());
    }

    #[test]
    fn test_unchanged_result_path_is_not_inspected() {
        let actions = analyze_splunk_changes(
            &json!([{"changed": false, "path": 42}]),
            &AnalyzeOptions::default(),
        )
        .unwrap();
        assert_eq!(actions, ActionSet::default());
    }

    #[test]
    fn test_null_path_on_changed_result_is_a_fault() {
        let result = analyze_splunk_changes(
            &json!([{"changed": true, "path": null}]),
            &AnalyzeOptions::default(),
        );
        assert!(matches!(result, Err(FilterError::Classification(_))));
    }

    #[test]
    fn test_non_string_path_on_changed_result_is_a_fault() {
        let result = analyze_splunk_changes(
            &json!([{"changed": true, "path": ["etc"]}]),
            &AnalyzeOptions::default(),
        );
        assert!(matches!(result, Err(FilterError::Classification(_))));
    }

    #[test]
    fn test_non_list_results_is_a_fault() {
        let result = analyze_splunk_changes(&json!({"changed": true}), &AnalyzeOptions::default());
        assert!(matches!(
            result,
            Err(FilterError::Classification(InputFault::NotAList { .. }))
        ));
    }

    #[test]
    fn test_filter_module_reads_kwargs() {
        let filter = ChangeAnalysisFilters.filters().remove(0);
        let value = filter
            .apply(&json!([]), &json!({"rolling_restart_pending": true}))
            .unwrap();

        assert_eq!(
            value,
            json!({
                "splunkd_restart_pending": false,
                "deploymentserver_reload": false,
                "deployer_push": false,
                "cluster_manager_push": false,
                "splunkd_restart": true
            })
        );
    }

    #[test]
    fn test_non_mapping_result_is_a_fault() {
        let result = analyze_splunk_changes(&json!(["changed"]), &AnalyzeOptions::default());
        assert!(result.is_err());
    }
}
