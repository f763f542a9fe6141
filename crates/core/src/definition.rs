// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task definitions submitted to the scheduler service
//!
//! A definition holds metadata, execution settings, the principal, exactly one
//! exec action and at most one trigger. The builder never attaches a trigger;
//! the registry does that once the trigger has been produced separately.

use crate::error::ValidationError;
use crate::params::{LogonKind, RunLevel, TaskParams};
use crate::trigger::TriggerSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Policy for a firing that arrives while an instance is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstancesPolicy {
    Parallel,
    Queue,
    /// The new firing is suppressed
    #[default]
    IgnoreNew,
    StopExisting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    pub description: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSettings {
    pub enabled: bool,
    pub start_when_available: bool,
    pub hidden: bool,
    pub run_only_if_idle: bool,
    pub wake_to_run: bool,
    pub multiple_instances: InstancesPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub run_level: RunLevel,
    pub logon: LogonKind,
}

/// Run an executable with arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecAction {
    pub path: PathBuf,
    pub arguments: String,
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub registration: RegistrationInfo,
    pub settings: TaskSettings,
    pub principal: Principal,
    pub action: ExecAction,
    pub trigger: Option<TriggerSpec>,
}

impl TaskDefinition {
    /// Attach the trigger, replacing any previous one
    pub fn with_trigger(mut self, trigger: TriggerSpec) -> Self {
        self.trigger = Some(trigger);
        self
    }
}

impl fmt::Display for TaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Action: {}", self.action.path.display())?;
        if !self.action.arguments.is_empty() {
            writeln!(f, "  Arguments: {}", self.action.arguments)?;
        }
        if let Some(dir) = &self.action.working_dir {
            writeln!(f, "  Working dir: {}", dir.display())?;
        }
        match &self.trigger {
            Some(trigger) => writeln!(f, "Trigger: {trigger}")?,
            None => writeln!(f, "Trigger: none")?,
        }
        writeln!(
            f,
            "Principal: {} logon, {:?} run level",
            self.principal.logon, self.principal.run_level
        )?;
        write!(f, "Author: {}", self.registration.author)
    }
}

/// Assembles definitions from task params
#[derive(Debug, Clone)]
pub struct TaskDefinitionBuilder {
    default_author: String,
}

impl TaskDefinitionBuilder {
    /// `default_author` is used when the params carry no username
    pub fn new(default_author: impl Into<String>) -> Self {
        Self {
            default_author: default_author.into(),
        }
    }

    pub fn default_author(&self) -> &str {
        &self.default_author
    }

    pub fn build(&self, params: &TaskParams) -> Result<TaskDefinition, ValidationError> {
        if params.exe.as_os_str().is_empty() {
            return Err(ValidationError::EmptyExecutable);
        }

        let exe_name = params
            .exe
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| params.exe.display().to_string());

        let author = params
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.default_author)
            .to_string();

        Ok(TaskDefinition {
            registration: RegistrationInfo {
                description: format!("Created by schedctl for {exe_name}"),
                author,
            },
            settings: TaskSettings {
                enabled: true,
                start_when_available: params.start_when_available,
                hidden: false,
                run_only_if_idle: false,
                wake_to_run: params.wake_to_run,
                multiple_instances: InstancesPolicy::IgnoreNew,
            },
            principal: Principal {
                run_level: params.run_level,
                logon: params.logon,
            },
            action: ExecAction {
                path: params.exe.clone(),
                arguments: params.arguments.clone(),
                working_dir: params.working_dir.clone(),
            },
            trigger: None,
        })
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
