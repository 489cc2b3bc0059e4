//! Integration tests for the steward-executor binary.
//!
//! These run the real binary but never reach docker: every covered path is
//! rejected before the first container call would happen.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use steward_common::ResultEnvelope;

fn executor() -> Command {
    Command::cargo_bin("steward-executor").expect("steward-executor binary should exist")
}

#[test]
fn missing_arguments_print_a_usage_envelope_and_exit_zero() {
    executor()
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success":false"#))
        .stdout(predicate::str::contains("usage:"));
}

#[test]
fn unknown_service_prints_the_unknown_service_envelope() {
    executor()
        .env("STEWARD_EXECUTOR_SERVICES", "svc-a,svc-b")
        .args(["svc-x", "start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Specified service is unknown"));
}

#[test]
fn unsupported_operation_is_rejected_for_a_known_service() {
    executor()
        .env("STEWARD_EXECUTOR_SERVICES", "svc-a")
        .args(["svc-a", "explode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("operation not supported by executor"));
}

#[test]
fn stdout_is_a_single_parseable_envelope() {
    let output = executor()
        .env("STEWARD_EXECUTOR_SERVICES", "svc-a")
        .args(["svc-a", "explode"])
        .output()
        .expect("executor should run");
    let text = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert_eq!(text.lines().count(), 1);

    let envelope: ResultEnvelope =
        serde_json::from_str(text.trim_end()).expect("stdout should be one envelope");
    assert_eq!(envelope.operation, "explode");
    assert_eq!(envelope.service, "svc-a");
    assert_eq!(envelope.executor, "docker");
    assert!(!envelope.success);
}
