// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Scratch directory with a config file the binary is pointed at.
/// Keeps the developer's own config out of the tests.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config("")
    }

    pub fn with_config(content: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("config.toml"), content).expect("Failed to write config");
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// `schedctl` with the env's config and logging limited to warnings
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("schedctl").expect("Failed to find schedctl binary");
        cmd.env("SCHEDCTL_CONFIG", self.config_path())
            .env("RUST_LOG", "warn")
            .current_dir(self.dir.path());
        cmd
    }
}

/// Arguments for a dry-run registration of `name` in `\Jobs`
pub fn dry_run_args(name: &str) -> Vec<String> {
    [
        "register",
        "--name",
        name,
        "--exe",
        "/usr/bin/backup",
        "--folder",
        "\\Jobs",
        "--trigger",
        "daily",
        "--at",
        "2025-01-01T09:00:00",
        "--dry-run",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
