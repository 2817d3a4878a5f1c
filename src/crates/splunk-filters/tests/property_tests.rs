//! Property tests for flattening and change analysis

use proptest::prelude::*;
use splunk_filters::changes::{classify_path, ChangeAction};
use splunk_filters::{
    analyze, flatten, ActionSet, AnalyzeOptions, ChangeRecord, ConfGroup, ConfOption, ConfSection,
};

fn section_name() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z:_/]{1,12}"]
}

fn conf_section() -> impl Strategy<Value = ConfSection> {
    (
        section_name(),
        prop::collection::vec(("[A-Za-z0-9_]{1,10}", "[ -~]{0,12}"), 0..5),
    )
        .prop_map(|(name, options)| {
            options
                .into_iter()
                .fold(ConfSection::new(name), |section, (option, value)| {
                    section.with_option(ConfOption::new(option, value))
                })
        })
}

fn conf_group() -> impl Strategy<Value = ConfGroup> {
    (
        "/[a-z/]{0,20}",
        "[a-z]{1,8}\\.conf",
        prop::collection::vec(conf_section(), 0..4),
    )
        .prop_map(|(filepath, filename, sections)| {
            sections
                .into_iter()
                .fold(ConfGroup::new(filepath, filename), ConfGroup::with_section)
        })
}

fn splunk_path() -> impl Strategy<Value = String> {
    let dirs = prop_oneof![
        Just("system/local"),
        Just("apps/search/local"),
        Just("deployment-apps/app/local"),
        Just("shcluster/apps/app/local"),
        Just("master-apps/_cluster/local"),
        Just("manager-apps/_cluster/local"),
    ];
    (
        prop_oneof![Just("/opt/splunk/etc/"), Just("/srv/"), Just("")],
        dirs,
        "[a-z]{1,8}\\.conf",
    )
        .prop_map(|(root, dir, file)| format!("{}{}/{}", root, dir, file))
}

fn change_record() -> impl Strategy<Value = ChangeRecord> {
    (any::<bool>(), splunk_path()).prop_map(|(changed, path)| ChangeRecord::new(changed, path))
}

fn analyze_options() -> impl Strategy<Value = AnalyzeOptions> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(rolling, pending, force_restart, force_push)| {
            AnalyzeOptions::new()
                .with_rolling_restart_pending(rolling)
                .with_splunkd_restart_pending(pending)
                .with_force_splunkd_restart(force_restart)
                .with_force_bundle_push(force_push)
        },
    )
}

fn implies(a: bool, b: bool) -> bool {
    !a || b
}

proptest! {
    #[test]
    fn flatten_emits_one_setting_per_retained_option(
        groups in prop::collection::vec(conf_group(), 0..5),
    ) {
        let settings = flatten(&groups).unwrap();

        let expected: Vec<(String, String, String)> = groups
            .iter()
            .flat_map(|group| {
                let path = format!(
                    "{}/{}",
                    group.filepath.as_deref().unwrap(),
                    group.filename.as_deref().unwrap()
                );
                group
                    .sections
                    .iter()
                    .filter(|section| section.section.as_deref() != Some(""))
                    .flat_map(move |section| {
                        let path = path.clone();
                        section.options.iter().map(move |option| {
                            (
                                path.clone(),
                                section.section.clone().unwrap(),
                                option.option.clone().unwrap(),
                            )
                        })
                    })
            })
            .collect();

        let actual: Vec<(String, String, String)> = settings
            .iter()
            .map(|s| (s.path.clone(), s.section.clone().unwrap(), s.option.clone().unwrap()))
            .collect();

        prop_assert_eq!(actual, expected);
        prop_assert!(settings
            .iter()
            .all(|s| s.state.as_deref() == Some("present") && s.comment.as_deref() == Some("")));
    }

    #[test]
    fn flatten_is_idempotent(groups in prop::collection::vec(conf_group(), 0..5)) {
        prop_assert_eq!(flatten(&groups).unwrap(), flatten(&groups).unwrap());
    }

    #[test]
    fn analyze_never_clears_seeded_flags(
        records in prop::collection::vec(change_record(), 0..8),
        options in analyze_options(),
    ) {
        let seeded = analyze(&[], &options);
        let actions = analyze(&records, &options);

        prop_assert!(implies(seeded.splunkd_restart_pending, actions.splunkd_restart_pending));
        prop_assert!(implies(seeded.deployer_push, actions.deployer_push));
        prop_assert_eq!(actions.splunkd_restart, options.rolling_restart_pending.then_some(true));
    }

    #[test]
    fn analyze_is_monotonic_in_records(
        records in prop::collection::vec(change_record(), 0..8),
        extra in change_record(),
    ) {
        let options = AnalyzeOptions::default();
        let before = analyze(&records, &options);
        let mut extended = records.clone();
        extended.push(extra);
        let after = analyze(&extended, &options);

        prop_assert!(implies(before.splunkd_restart_pending, after.splunkd_restart_pending));
        prop_assert!(implies(before.deploymentserver_reload, after.deploymentserver_reload));
        prop_assert!(implies(before.deployer_push, after.deployer_push));
        prop_assert!(implies(before.cluster_manager_push, after.cluster_manager_push));
    }

    #[test]
    fn analyze_matches_per_record_classification(
        records in prop::collection::vec(change_record(), 0..8),
    ) {
        let actions = analyze(&records, &AnalyzeOptions::default());
        let classified: Vec<ChangeAction> = records
            .iter()
            .filter(|record| record.changed)
            .filter_map(|record| classify_path(&record.path))
            .collect();

        let expected = ActionSet {
            splunkd_restart_pending: classified.contains(&ChangeAction::SplunkdRestart),
            deploymentserver_reload: classified.contains(&ChangeAction::DeploymentServerReload),
            deployer_push: classified.contains(&ChangeAction::DeployerPush),
            cluster_manager_push: classified.contains(&ChangeAction::ClusterManagerPush),
            splunkd_restart: None,
        };
        prop_assert_eq!(actions, expected);
    }

    #[test]
    fn unchanged_records_have_no_effect(paths in prop::collection::vec(splunk_path(), 0..8)) {
        let records: Vec<ChangeRecord> = paths.into_iter().map(ChangeRecord::unchanged).collect();
        prop_assert_eq!(analyze(&records, &AnalyzeOptions::default()), ActionSet::default());
    }
}
