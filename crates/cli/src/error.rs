// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error is shown as:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use schedctl_adapters::ServiceError;
use schedctl_core::{ConfigError, FolderPath, ValidationError};
use schedctl_engine::RegistryError;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

/// Render any command failure for the terminal
pub fn render(err: &anyhow::Error) -> CliError {
    if let Some(e) = err.downcast_ref::<RegistryError>() {
        return CliError::from(e);
    }
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return CliError::from(e);
    }
    CliError::new(format!("{err:#}"))
}

fn list_hint(folder: &FolderPath) -> String {
    format!("List the folder: schedctl list --folder '{folder}'")
}

impl From<&RegistryError> for CliError {
    fn from(err: &RegistryError) -> Self {
        let base = CliError::new(err.to_string());
        match err {
            RegistryError::Connection(reason) => {
                let base = base.with_context("The Task Scheduler service could not be reached");
                match reason {
                    ServiceError::AccessDenied(_) => base
                        .with_suggestion("Run from an elevated prompt or an account allowed to query the scheduler"),
                    _ => base
                        .with_context("schedctl only manages tasks on Windows")
                        .with_suggestion("Check the service is running: sc query Schedule"),
                }
            }
            RegistryError::FolderResolution { path, .. } => base
                .with_context(format!("Missing segments of {path} are created on demand"))
                .with_suggestion("Run elevated if the parent folder is protected")
                .with_suggestion("Use an existing folder with --folder"),
            RegistryError::Validation(reason) => {
                let base = base.with_context("Nothing was sent to the scheduler");
                match reason {
                    ValidationError::UnsupportedTriggerKind(_) => {
                        base.with_suggestion("Use --trigger daily, --trigger once or --trigger logon")
                    }
                    ValidationError::InvalidTimeFormat(_) => {
                        base.with_suggestion("Use --at 2025-01-01T09:00:00")
                    }
                    ValidationError::MissingCredentials { .. } => {
                        base.with_suggestion("Pass --username and --password")
                    }
                    _ => base.with_suggestion("See: schedctl register --help"),
                }
            }
            RegistryError::NotFound { folder, .. } => base
                .with_context("The task may have been deleted or registered in another folder")
                .with_suggestion(list_hint(folder)),
            RegistryError::Registration { .. } => base
                .with_context("The scheduler rejected the definition")
                .with_suggestion("Run elevated when using --highest or --logon service")
                .with_suggestion("Check that --exe and --workdir exist"),
            RegistryError::Authentication { .. } => base
                .with_context("The account name or password was not accepted")
                .with_suggestion("Check --username and --password")
                .with_suggestion("The account needs the 'Log on as a batch job' right"),
            RegistryError::Service { folder, .. } => base.with_suggestion(list_hint(folder)),
        }
    }
}

impl From<&ConfigError> for CliError {
    fn from(err: &ConfigError) -> Self {
        CliError::new(err.to_string())
            .with_context("Config is read from --config, then $SCHEDCTL_CONFIG, then the user config dir")
            .with_suggestion("Check the file exists and is valid TOML")
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
