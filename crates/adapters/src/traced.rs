// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::scheduler::{SchedulerService, SchedulerSession, ServiceError};
use schedctl_core::{Credentials, FolderPath, RegisteredTask, TaskDefinition};
use std::time::Instant;

/// Wrapper that adds tracing to any SchedulerService
#[derive(Clone)]
pub struct TracedScheduler<S> {
    inner: S,
}

impl<S> TracedScheduler<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SchedulerService> SchedulerService for TracedScheduler<S> {
    type Session = TracedSession<S::Session>;

    fn connect(&self) -> Result<Self::Session, ServiceError> {
        let span = tracing::info_span!("scheduler.connect");
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.connect();
        let elapsed = start.elapsed();

        match result {
            Ok(session) => {
                tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "connected");
                Ok(TracedSession::new(session))
            }
            Err(e) => {
                tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "connect failed"
                );
                Err(e)
            }
        }
    }
}

/// Wrapper that adds tracing to any SchedulerSession
pub struct TracedSession<T> {
    inner: T,
}

impl<T> TracedSession<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: SchedulerSession> SchedulerSession for TracedSession<T> {
    fn folder_exists(&self, path: &FolderPath) -> Result<bool, ServiceError> {
        let result = self.inner.folder_exists(path);
        tracing::trace!(path = %path, exists = ?result.as_ref().ok(), "checked folder");
        result
    }

    fn create_folder(&self, parent: &FolderPath, name: &str) -> Result<FolderPath, ServiceError> {
        let span = tracing::info_span!("scheduler.create_folder", parent = %parent, name);
        let _guard = span.enter();

        let result = self.inner.create_folder(parent, name);
        match &result {
            Ok(path) => tracing::info!(path = %path, "folder created"),
            Err(e) => tracing::error!(error = %e, "create folder failed"),
        }

        result
    }

    fn register_task(
        &self,
        folder: &FolderPath,
        name: &str,
        definition: &TaskDefinition,
        credentials: &Credentials,
    ) -> Result<RegisteredTask, ServiceError> {
        let span = tracing::info_span!("scheduler.register", folder = %folder, name);
        let _guard = span.enter();

        tracing::info!(
            logon = %credentials.logon_kind(),
            trigger = definition.trigger.as_ref().map(|t| t.kind().as_str()),
            "registering"
        );

        let start = Instant::now();
        let result = self.inner.register_task(folder, name, definition, credentials);
        let elapsed = start.elapsed();

        match &result {
            Ok(task) => tracing::info!(
                path = %task.path,
                state = %task.state,
                elapsed_ms = elapsed.as_millis() as u64,
                "registered"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "register failed"
            ),
        }

        result
    }

    fn get_task(
        &self,
        folder: &FolderPath,
        name: &str,
    ) -> Result<Option<RegisteredTask>, ServiceError> {
        let result = self.inner.get_task(folder, name);
        tracing::trace!(
            folder = %folder,
            name,
            found = ?result.as_ref().map(Option::is_some).ok(),
            "looked up task"
        );
        result
    }

    fn run_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError> {
        let span = tracing::info_span!("scheduler.run", folder = %folder, name);
        let _guard = span.enter();

        let result = self.inner.run_task(folder, name);
        match &result {
            Ok(()) => tracing::info!("run requested"),
            Err(e) => tracing::error!(error = %e, "run failed"),
        }

        result
    }

    fn delete_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError> {
        let span = tracing::info_span!("scheduler.delete", folder = %folder, name);
        let _guard = span.enter();

        let result = self.inner.delete_task(folder, name);
        // A missing task is reported to the caller, not treated as a fault here
        match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(ServiceError::NotFound(_)) => tracing::warn!("task not found"),
            Err(e) => tracing::error!(error = %e, "delete failed"),
        }

        result
    }

    fn list_tasks(&self, folder: &FolderPath) -> Result<Vec<RegisteredTask>, ServiceError> {
        let result = self.inner.list_tasks(folder);
        tracing::debug!(
            folder = %folder,
            count = result.as_ref().map(|v| v.len()).ok(),
            "listed tasks"
        );
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
