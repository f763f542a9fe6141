// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for `schedctl register`
//!
//! Validation failures and dry runs never reach the scheduler service, so
//! these run on every platform.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use common::{dry_run_args, TestEnv};
use predicates::prelude::*;
use serde_json::Value;

fn dry_run_json(env: &TestEnv, extra: &[&str]) -> Value {
    let assert = env
        .cmd()
        .args(dry_run_args("Nightly"))
        .args(["--format", "json"])
        .args(extra)
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

#[test]
fn empty_name_fails_validation() {
    let env = TestEnv::new();

    env.cmd()
        .args(["register", "--name", "", "--exe", "/bin/x", "--trigger", "daily"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("task name must not be empty"));
}

#[test]
fn unsupported_trigger_fails_validation() {
    let env = TestEnv::new();

    env.cmd()
        .args(["register", "--name", "Job", "--exe", "/bin/x", "--trigger", "weekly"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported trigger kind: 'weekly'"))
        .stderr(predicate::str::contains("--trigger daily"));
}

#[test]
fn malformed_time_fails_validation() {
    let env = TestEnv::new();

    env.cmd()
        .args([
            "register", "--name", "Job", "--exe", "/bin/x", "--trigger", "once", "--at",
            "01/01/2025",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid time format: '01/01/2025'"));
}

#[test]
fn invalid_folder_fails_validation() {
    let env = TestEnv::new();

    env.cmd()
        .args([
            "register", "--name", "Job", "--exe", "/bin/x", "--trigger", "logon", "--folder",
            "\\Jobs\\..",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid folder path"));
}

#[test]
fn password_logon_requires_username() {
    let env = TestEnv::new();

    env.cmd()
        .args([
            "register", "--name", "Job", "--exe", "/bin/x", "--trigger", "logon", "--logon",
            "password", "--password", "pw",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("password logon requires a username"));
}

#[test]
fn dry_run_prints_definition() {
    let env = TestEnv::with_config("author = \"ops-bot\"\n");

    env.cmd()
        .args(dry_run_args("Nightly"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Task: \\Jobs\\Nightly"))
        .stdout(predicate::str::contains("Trigger: daily from 2025-01-01T09:00:00"))
        .stdout(predicate::str::contains("Author: ops-bot"));
}

#[test]
fn dry_run_json_uses_configured_author() {
    let env = TestEnv::with_config("author = \"ops-bot\"\n");

    let json = dry_run_json(&env, &[]);

    assert_eq!(json["name"], "Nightly");
    assert_eq!(json["folder"], "\\Jobs");
    assert_eq!(json["logon"], "interactive");
    let definition = &json["definition"];
    assert_eq!(definition["registration"]["author"], "ops-bot");
    assert_eq!(
        definition["registration"]["description"],
        "Created by schedctl for backup"
    );
    assert_eq!(definition["settings"]["start_when_available"], true);
    assert_eq!(definition["settings"]["multiple_instances"], "ignore_new");
    assert_eq!(definition["trigger"]["kind"], "daily");
    assert_eq!(definition["trigger"]["start_boundary"], "2025-01-01T09:00:00");
}

#[test]
fn dry_run_maps_flags_onto_definition() {
    let env = TestEnv::new();

    let json = dry_run_json(
        &env,
        &[
            "--args",
            "--full --verbose",
            "--workdir",
            "/srv/backup",
            "--highest",
            "--wake",
            "--no-start-when-available",
        ],
    );

    let definition = &json["definition"];
    assert_eq!(definition["action"]["arguments"], "--full --verbose");
    assert_eq!(definition["action"]["working_dir"], "/srv/backup");
    assert_eq!(definition["principal"]["run_level"], "highest");
    assert_eq!(definition["settings"]["wake_to_run"], true);
    assert_eq!(definition["settings"]["start_when_available"], false);
}

#[test]
fn dry_run_uses_configured_default_folder() {
    let env = TestEnv::with_config("default_folder = \"\\\\Ops\\\\Nightly\"\n");

    let assert = env
        .cmd()
        .args([
            "register", "--name", "Job", "--exe", "/bin/x", "--trigger", "logon", "--dry-run",
            "--format", "json",
        ])
        .assert()
        .success();
    let json: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(json["folder"], "\\Ops\\Nightly");
    assert_eq!(json["definition"]["trigger"]["kind"], "logon");
}

#[test]
fn dry_run_never_prints_password() {
    let env = TestEnv::new();

    let assert = env
        .cmd()
        .args(dry_run_args("Nightly"))
        .args([
            "--logon",
            "password",
            "--username",
            "svc_backup",
            "--password",
            "hunter2",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stdout.contains("User: svc_backup"), "{stdout}");
    assert!(!stdout.contains("hunter2"), "{stdout}");
    assert!(!stderr.contains("hunter2"), "{stderr}");
}

#[test]
fn trigger_kind_is_case_insensitive() {
    let env = TestEnv::new();

    env.cmd()
        .args([
            "register", "--name", "Job", "--exe", "/bin/x", "--trigger", "LOGON", "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trigger: at logon"));
}

#[cfg(not(windows))]
#[test]
fn register_off_windows_fails_after_validation() {
    let env = TestEnv::new();
    let args: Vec<String> = dry_run_args("Nightly")
        .into_iter()
        .filter(|a| a != "--dry-run")
        .collect();

    env.cmd()
        .args(args)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot connect to the scheduler service"));
}
