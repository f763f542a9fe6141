// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation errors raised before any call reaches the scheduler service

use thiserror::Error;

/// Input rejected during validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task name must not be empty")]
    EmptyName,
    #[error("invalid task name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
    #[error("invalid folder path '{path}': {reason}")]
    InvalidFolderPath { path: String, reason: String },
    #[error("executable path must not be empty")]
    EmptyExecutable,
    #[error("unsupported trigger kind: '{0}' (expected daily, once or logon)")]
    UnsupportedTriggerKind(String),
    #[error("invalid time format: '{0}' (expected YYYY-mm-ddTHH:MM:SS)")]
    InvalidTimeFormat(String),
    #[error("{logon} logon requires {missing}")]
    MissingCredentials {
        logon: &'static str,
        missing: &'static str,
    },
}
