//! End-to-end contribution scenarios against in-memory host fakes.

use std::collections::BTreeMap;

use cienv_core::{EnvContributor, EnvLookup, EnvTarget, EnvVars, MessageDelivery, SkipReason};
use cienv_host::fakes::FakeRun;

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Scenario A: message goes to the workspace file, other keys injected.
#[tokio::test]
async fn test_message_redirected_and_status_injected() {
    let run = FakeRun::with_workspace("/ws");
    let contributor =
        EnvContributor::from_message(params(&[("CI_MESSAGE", "hello"), ("CI_STATUS", "success")]));
    let mut env = EnvVars::new();

    contributor.contribute(&run, Some(&mut env)).await;

    assert_eq!(env.get("CI_MESSAGE_FILE"), Some("/ws/.ci_message.txt"));
    assert_eq!(env.get("CI_STATUS"), Some("success"));
    assert!(!env.contains_var("CI_MESSAGE"));
    assert_eq!(
        run.memory_fs().contents("/ws/.ci_message.txt").as_deref(),
        Some("hello")
    );
}

/// Scenario B: a job parameter reserves CI_STATUS.
#[tokio::test]
async fn test_reserved_status_not_injected() {
    let run = FakeRun::with_workspace("/ws");
    let contributor = EnvContributor::new(
        Some(params(&[("CI_MESSAGE", "hello"), ("CI_STATUS", "success")])),
        Some(vec!["CI_STATUS"]),
    );
    let mut env = EnvVars::new();

    let report = contributor.contribute(&run, Some(&mut env)).await;

    assert_eq!(env.get("CI_MESSAGE_FILE"), Some("/ws/.ci_message.txt"));
    assert!(!env.contains_var("CI_STATUS"));
    assert_eq!(
        report.skipped,
        vec![("CI_STATUS".to_string(), SkipReason::ReservedByJobParameter)]
    );
}

/// Scenario C: no workspace, message falls back to the environment.
#[tokio::test]
async fn test_unresolvable_workspace_falls_back() {
    let run = FakeRun::without_workspace();
    let contributor = EnvContributor::from_message(params(&[("CI_MESSAGE", "big-payload")]));
    let mut env = EnvVars::new();

    let report = contributor.contribute(&run, Some(&mut env)).await;

    assert_eq!(env.get("CI_MESSAGE"), Some("big-payload"));
    assert!(!env.contains_var("CI_MESSAGE_FILE"));
    assert_eq!(run.memory_fs().file_count(), 0);
    assert!(matches!(
        report.message,
        Some(MessageDelivery::Fallback { .. })
    ));
}

/// Scenario D: CI_MESSAGE already in the environment is left alone.
#[tokio::test]
async fn test_existing_message_untouched() {
    let run = FakeRun::with_workspace("/ws");
    let contributor = EnvContributor::from_message(params(&[("CI_MESSAGE", "x")]));
    let mut env = EnvVars::new();
    env.put_var("CI_MESSAGE".to_string(), "prior".to_string());

    let report = contributor.contribute(&run, Some(&mut env)).await;

    assert_eq!(env.get("CI_MESSAGE"), Some("prior"));
    assert!(!env.contains_var("CI_MESSAGE_FILE"));
    assert_eq!(env.len(), 1);
    assert_eq!(run.memory_fs().write_count(), 0);
    assert!(report.message.is_none());
    assert_eq!(
        report.skipped,
        vec![("CI_MESSAGE".to_string(), SkipReason::AlreadySetInEnvironment)]
    );
}

#[tokio::test]
async fn test_existing_variables_not_overwritten() {
    let run = FakeRun::with_workspace("/ws");
    let contributor = EnvContributor::from_message(params(&[
        ("PATH", "/tmp/evil"),
        ("CI_BRANCH", "main"),
    ]));
    let mut env = EnvVars::new();
    env.put_var("PATH".to_string(), "/usr/bin".to_string());

    contributor.contribute(&run, Some(&mut env)).await;

    assert_eq!(env.get("PATH"), Some("/usr/bin"));
    assert_eq!(env.get("CI_BRANCH"), Some("main"));
}

#[tokio::test]
async fn test_pipeline_run_writes_under_workspace_subdir() {
    let run = FakeRun::rooted_at("/jobs/pipe/builds/9");
    let contributor = EnvContributor::from_message(params(&[("CI_MESSAGE", "{\"a\":1}")]));
    let mut env = EnvVars::new();

    contributor.contribute(&run, Some(&mut env)).await;

    let path = "/jobs/pipe/builds/9/workspace/.ci_message.txt";
    assert_eq!(env.get("CI_MESSAGE_FILE"), Some(path));
    assert_eq!(run.memory_fs().contents(path).as_deref(), Some("{\"a\":1}"));
}

#[tokio::test]
async fn test_hashmap_environment_supported() {
    let run = FakeRun::with_workspace("/ws");
    let contributor = EnvContributor::from_message(params(&[("CI_STATUS", "failed")]));
    let mut env: std::collections::HashMap<String, String> = std::collections::HashMap::new();

    contributor.contribute(&run, Some(&mut env)).await;

    assert_eq!(env.var("CI_STATUS"), Some("failed"));
}
