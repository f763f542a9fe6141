// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler service adapters
//!
//! The service is reached through a session opened by [`SchedulerService::connect`].
//! Sessions are not pooled: callers open one per operation and drop it when
//! the operation ends.

mod ole_date;
mod task_scheduler;

pub use task_scheduler::{TaskSchedulerService, TaskSchedulerSession};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFolder, FakeScheduler, FakeSession, FakeTask, SchedulerCall};

use schedctl_core::{Credentials, FolderPath, RegisteredTask, TaskDefinition};
use thiserror::Error;

/// Errors reported by the scheduler service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("scheduler service unavailable: {0}")]
    Unavailable(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("logon failure: {0}")]
    LogonFailure(String),
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Connects to the scheduler service
pub trait SchedulerService: Clone + Send + Sync + 'static {
    type Session: SchedulerSession;

    /// Open a session; fails if the service is unreachable or the caller
    /// may not query it
    fn connect(&self) -> Result<Self::Session, ServiceError>;
}

/// An open connection to the scheduler service
pub trait SchedulerSession {
    /// Whether the folder exists
    fn folder_exists(&self, path: &FolderPath) -> Result<bool, ServiceError>;

    /// Create folder `name` under `parent`, returning the new path
    fn create_folder(&self, parent: &FolderPath, name: &str) -> Result<FolderPath, ServiceError>;

    /// Create or replace the task `name` in `folder`
    fn register_task(
        &self,
        folder: &FolderPath,
        name: &str,
        definition: &TaskDefinition,
        credentials: &Credentials,
    ) -> Result<RegisteredTask, ServiceError>;

    /// Look up a task; `None` if absent
    fn get_task(&self, folder: &FolderPath, name: &str)
        -> Result<Option<RegisteredTask>, ServiceError>;

    /// Request an immediate run without waiting for it
    fn run_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError>;

    /// Delete a task; `NotFound` if absent
    fn delete_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError>;

    /// Tasks directly inside `folder`, in no particular order
    fn list_tasks(&self, folder: &FolderPath) -> Result<Vec<RegisteredTask>, ServiceError>;
}
