use std::fs;

use calyx::{
    diagnostics::CalyxError,
    host::{HostState, RunOutcome, ScriptHost},
};
use tempfile::tempdir;

#[test]
fn created_host_is_ready() {
    let host = ScriptHost::create().expect("host builds");
    assert_eq!(host.state(), HostState::Ready);
}

#[test]
fn successful_run_terminates_host() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("ok.cx");
    fs::write(
        &script,
        "print(calculateLevenshteinInC(\"kitten\", \"sitting\"))",
    )
    .expect("write script");

    let mut host = ScriptHost::create().expect("host builds");
    let outcome = host.run_file(&script).expect("run completes");
    assert!(matches!(outcome, RunOutcome::Completed));
    assert_eq!(host.state(), HostState::Terminated);
}

#[test]
fn evaluation_failure_is_reported_not_fatal() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("bad.cx");
    fs::write(&script, "calculateLevenshteinInC(\"ok\", 2)").expect("write script");

    let mut host = ScriptHost::create().expect("host builds");
    let outcome = host.run_file(&script).expect("run is not fatal");
    match outcome {
        RunOutcome::Failed(CalyxError::Diagnostic(diagnostic)) => {
            assert!(diagnostic.message.contains("String"), "{diagnostic}");
        }
        other => panic!("expected failed outcome, found {other:?}"),
    }
    assert_eq!(host.state(), HostState::Terminated);
}

#[test]
fn missing_script_is_fatal_and_host_stays_ready() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("absent.cx");

    let mut host = ScriptHost::create().expect("host builds");
    let err = host.run_file(&script).expect_err("load should fail");
    assert!(matches!(err, CalyxError::Load { .. }));
    assert_eq!(host.state(), HostState::Ready);
}

#[test]
fn second_submission_is_rejected() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("once.cx");
    fs::write(&script, "1 + 1").expect("write script");

    let mut host = ScriptHost::create().expect("host builds");
    host.run_file(&script).expect("first run");
    let err = host
        .run_file(&script)
        .expect_err("second run should be rejected");
    let message = format!("{err}");
    assert!(message.contains("already run its script"), "{message}");
}
