// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod delete;
pub mod list;
pub mod register;
pub mod run;

use schedctl_adapters::{TaskSchedulerService, TracedScheduler};
use schedctl_core::{
    Config, FolderPath, SystemClock, TaskDefinitionBuilder, TriggerFactory,
};
use schedctl_engine::{RegistryError, TaskRegistry};

pub type Registry = TaskRegistry<TracedScheduler<TaskSchedulerService>, SystemClock>;

/// Shared state for one command invocation
pub struct Context {
    pub registry: Registry,
    pub default_folder: FolderPath,
}

impl Context {
    /// Build the registry; the default author is resolved here, once
    pub fn new(config: &Config) -> Self {
        let author = config.resolved_author();
        tracing::debug!(author = %author, folder = %config.default_folder, "resolved defaults");

        let registry = TaskRegistry::new(
            TracedScheduler::new(TaskSchedulerService::new()),
            TriggerFactory::new(SystemClock).with_default_delay(config.default_delay),
            TaskDefinitionBuilder::new(author),
        );

        Self {
            registry,
            default_folder: config.default_folder.clone(),
        }
    }

    /// The `--folder` value, or the configured default
    pub fn folder(&self, arg: Option<&str>) -> Result<FolderPath, RegistryError> {
        match arg {
            Some(path) => FolderPath::parse(path).map_err(RegistryError::from),
            None => Ok(self.default_folder.clone()),
        }
    }
}
