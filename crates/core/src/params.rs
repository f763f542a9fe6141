// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task registration parameters

use crate::error::ValidationError;
use crate::folder::FolderPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Account used for service-account logon when no username is given
pub const DEFAULT_SERVICE_ACCOUNT: &str = "SYSTEM";

/// Privilege level the task's action runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLevel {
    #[default]
    Standard,
    Highest,
}

/// Identity model used to run the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogonKind {
    /// Run as the account that registers the task, only while it is logged on
    #[default]
    Interactive,
    /// Explicit username and password stored with the task
    Password,
    /// Built-in service account such as SYSTEM
    ServiceAccount,
}

impl LogonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogonKind::Interactive => "interactive",
            LogonKind::Password => "password",
            LogonKind::ServiceAccount => "service",
        }
    }
}

impl fmt::Display for LogonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials forwarded to the scheduler service at registration.
///
/// Each variant carries only what its logon kind needs.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Nothing is forwarded; the registering account is used
    InteractiveUser,
    Password { username: String, password: String },
    ServiceAccount { account: String },
}

impl Credentials {
    pub fn logon_kind(&self) -> LogonKind {
        match self {
            Credentials::InteractiveUser => LogonKind::Interactive,
            Credentials::Password { .. } => LogonKind::Password,
            Credentials::ServiceAccount { .. } => LogonKind::ServiceAccount,
        }
    }

    /// User id forwarded to the service, `None` when nothing is forwarded
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Credentials::InteractiveUser => None,
            Credentials::Password { username, .. } => Some(username),
            Credentials::ServiceAccount { account } => Some(account),
        }
    }

    /// Password forwarded to the service, `None` when nothing is forwarded
    pub fn password(&self) -> Option<&str> {
        match self {
            Credentials::Password { password, .. } => Some(password),
            _ => None,
        }
    }
}

// Never print the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::InteractiveUser => f.write_str("InteractiveUser"),
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::ServiceAccount { account } => f
                .debug_struct("ServiceAccount")
                .field("account", account)
                .finish(),
        }
    }
}

/// Everything needed to register a task, minus its trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskParams {
    pub name: String,
    pub exe: PathBuf,
    pub arguments: String,
    pub working_dir: Option<PathBuf>,
    pub folder: FolderPath,
    pub run_level: RunLevel,
    pub wake_to_run: bool,
    pub start_when_available: bool,
    pub logon: LogonKind,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TaskParams {
    /// Params with the defaults used by the command line
    pub fn new(name: impl Into<String>, exe: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            exe: exe.into(),
            arguments: String::new(),
            working_dir: None,
            folder: FolderPath::root(),
            run_level: RunLevel::Standard,
            wake_to_run: false,
            start_when_available: true,
            logon: LogonKind::Interactive,
            username: None,
            password: None,
        }
    }

    pub fn with_folder(mut self, folder: FolderPath) -> Self {
        self.folder = folder;
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_run_level(mut self, run_level: RunLevel) -> Self {
        self.run_level = run_level;
        self
    }

    pub fn with_logon(
        mut self,
        logon: LogonKind,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        self.logon = logon;
        self.username = username;
        self.password = password;
        self
    }

    /// Check the task name
    pub fn validate_name(&self) -> Result<(), ValidationError> {
        validate_task_name(&self.name)
    }

    /// Resolve the credentials to forward for this logon kind
    pub fn credentials(&self) -> Result<Credentials, ValidationError> {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }

        match self.logon {
            LogonKind::Interactive => Ok(Credentials::InteractiveUser),
            LogonKind::Password => {
                let username = non_empty(&self.username).ok_or(
                    ValidationError::MissingCredentials {
                        logon: "password",
                        missing: "a username",
                    },
                )?;
                let password = non_empty(&self.password).ok_or(
                    ValidationError::MissingCredentials {
                        logon: "password",
                        missing: "a password",
                    },
                )?;
                Ok(Credentials::Password {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            LogonKind::ServiceAccount => Ok(Credentials::ServiceAccount {
                account: non_empty(&self.username)
                    .unwrap_or(DEFAULT_SERVICE_ACCOUNT)
                    .to_string(),
            }),
        }
    }
}

/// Task names are keys within a folder and may not contain separators
pub fn validate_task_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.contains('\\') || name.contains('/') {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "must not contain path separators".to_string(),
        });
    }
    if name.trim() != name {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "must not start or end with whitespace".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
