// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task registry: register, run, delete and list tasks
//!
//! Requests are validated in full before the service is contacted. Each
//! operation connects, resolves its folder and performs a single action;
//! the session is dropped when the operation returns.

use crate::error::RegistryError;
use crate::folder::FolderResolver;
use schedctl_adapters::{SchedulerService, SchedulerSession, ServiceError};
use schedctl_core::params::validate_task_name;
use schedctl_core::{
    Clock, Credentials, FolderPath, LogonKind, RegisteredTask, SystemClock, TaskDefinition,
    TaskDefinitionBuilder, TaskParams, TriggerFactory,
};
use serde::Serialize;
use std::fmt;

/// A fully validated registration, ready to submit
#[derive(Debug, Clone, Serialize)]
pub struct PreparedTask {
    pub folder: FolderPath,
    pub name: String,
    pub logon: LogonKind,
    pub user_id: Option<String>,
    pub definition: TaskDefinition,
    #[serde(skip)]
    pub credentials: Credentials,
}

impl PreparedTask {
    /// Full task path, e.g. `\Jobs\Nightly`
    pub fn path(&self) -> String {
        self.folder.task_path(&self.name)
    }
}

impl fmt::Display for PreparedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task: {}", self.path())?;
        if let Some(user) = &self.user_id {
            writeln!(f, "User: {user}")?;
        }
        write!(f, "{}", self.definition)
    }
}

/// Registers and manages tasks through a scheduler service
pub struct TaskRegistry<S, C: Clock = SystemClock> {
    service: S,
    triggers: TriggerFactory<C>,
    builder: TaskDefinitionBuilder,
    folders: FolderResolver,
}

impl<S: SchedulerService, C: Clock> TaskRegistry<S, C> {
    pub fn new(service: S, triggers: TriggerFactory<C>, builder: TaskDefinitionBuilder) -> Self {
        Self {
            service,
            triggers,
            builder,
            folders: FolderResolver::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Validate a registration and build its definition without contacting
    /// the service
    pub fn prepare(
        &self,
        params: &TaskParams,
        trigger_kind: &str,
        when: Option<&str>,
    ) -> Result<PreparedTask, RegistryError> {
        params.validate_name()?;
        let credentials = params.credentials()?;
        let trigger = self.triggers.create(trigger_kind, when)?;
        let definition = self.builder.build(params)?.with_trigger(trigger);

        Ok(PreparedTask {
            folder: params.folder.clone(),
            name: params.name.clone(),
            logon: credentials.logon_kind(),
            user_id: credentials.user_id().map(str::to_string),
            definition,
            credentials,
        })
    }

    /// Create or replace a task
    pub fn register(
        &self,
        params: &TaskParams,
        trigger_kind: &str,
        when: Option<&str>,
    ) -> Result<RegisteredTask, RegistryError> {
        let prepared = self.prepare(params, trigger_kind, when)?;
        self.submit(&prepared)
    }

    /// Submit an already prepared registration
    pub fn submit(&self, prepared: &PreparedTask) -> Result<RegisteredTask, RegistryError> {
        let PreparedTask {
            folder,
            name,
            definition,
            credentials,
            ..
        } = prepared;

        let session = self.connect()?;
        let folder = self.folders.resolve(&session, folder)?;

        let task = session
            .register_task(&folder, name, definition, credentials)
            .map_err(|reason| match reason {
                ServiceError::LogonFailure(_) => RegistryError::Authentication {
                    name: name.clone(),
                    folder: folder.clone(),
                    reason,
                },
                _ => RegistryError::Registration {
                    name: name.clone(),
                    folder: folder.clone(),
                    reason,
                },
            })?;

        tracing::info!(
            name = %name,
            folder = %folder,
            trigger = definition.trigger.as_ref().map(|t| t.kind().as_str()),
            "registered task"
        );
        Ok(task)
    }

    /// Request an immediate run; does not wait for it to finish
    pub fn run(&self, name: &str, folder: &FolderPath) -> Result<(), RegistryError> {
        validate_task_name(name)?;

        let session = self.connect()?;
        let folder = self.folders.resolve(&session, folder)?;
        let not_found = || RegistryError::NotFound {
            name: name.to_string(),
            folder: folder.clone(),
        };

        let existing = session
            .get_task(&folder, name)
            .map_err(|reason| service_error("run", name, &folder, reason))?;
        if existing.is_none() {
            return Err(not_found());
        }

        session.run_task(&folder, name).map_err(|reason| match reason {
            ServiceError::NotFound(_) => not_found(),
            reason => service_error("run", name, &folder, reason),
        })?;

        tracing::info!(name, folder = %folder, "requested run");
        Ok(())
    }

    /// Remove a task; a missing task is an error
    pub fn delete(&self, name: &str, folder: &FolderPath) -> Result<(), RegistryError> {
        validate_task_name(name)?;

        let session = self.connect()?;
        let folder = self.folders.resolve(&session, folder)?;

        session
            .delete_task(&folder, name)
            .map_err(|reason| match reason {
                ServiceError::NotFound(_) => RegistryError::NotFound {
                    name: name.to_string(),
                    folder: folder.clone(),
                },
                reason => service_error("delete", name, &folder, reason),
            })?;

        tracing::info!(name, folder = %folder, "deleted task");
        Ok(())
    }

    /// Tasks directly inside `folder`, read fresh from the service.
    ///
    /// Order is whatever the service reports.
    pub fn list(&self, folder: &FolderPath) -> Result<Vec<RegisteredTask>, RegistryError> {
        let session = self.connect()?;
        let folder = self.folders.resolve(&session, folder)?;

        let tasks = session
            .list_tasks(&folder)
            .map_err(|reason| RegistryError::Service {
                operation: "list",
                name: None,
                folder: folder.clone(),
                reason,
            })?;

        tracing::debug!(folder = %folder, count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    fn connect(&self) -> Result<S::Session, RegistryError> {
        self.service.connect().map_err(RegistryError::Connection)
    }
}

fn service_error(
    operation: &'static str,
    name: &str,
    folder: &FolderPath,
    reason: ServiceError,
) -> RegistryError {
    RegistryError::Service {
        operation,
        name: Some(name.to_string()),
        folder: folder.clone(),
        reason,
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
