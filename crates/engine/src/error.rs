// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for registry operations

use schedctl_adapters::ServiceError;
use schedctl_core::{FolderPath, ValidationError};
use thiserror::Error;

/// Errors that can occur in registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot connect to the scheduler service: {0}")]
    Connection(ServiceError),
    #[error("cannot resolve folder {path}: {reason}")]
    FolderResolution {
        path: FolderPath,
        reason: ServiceError,
    },
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("task '{name}' not found in folder {folder}")]
    NotFound { name: String, folder: FolderPath },
    #[error("registration of '{name}' in folder {folder} rejected: {reason}")]
    Registration {
        name: String,
        folder: FolderPath,
        reason: ServiceError,
    },
    #[error("credentials for '{name}' in folder {folder} rejected: {reason}")]
    Authentication {
        name: String,
        folder: FolderPath,
        reason: ServiceError,
    },
    #[error("{operation} failed for {}: {reason}", target(.folder, .name.as_deref()))]
    Service {
        operation: &'static str,
        name: Option<String>,
        folder: FolderPath,
        reason: ServiceError,
    },
}

fn target(folder: &FolderPath, name: Option<&str>) -> String {
    match name {
        Some(name) => folder.task_path(name),
        None => format!("folder {folder}"),
    }
}

impl RegistryError {
    /// Folder the failed operation addressed, if any
    pub fn folder(&self) -> Option<&FolderPath> {
        match self {
            RegistryError::FolderResolution { path, .. } => Some(path),
            RegistryError::NotFound { folder, .. }
            | RegistryError::Registration { folder, .. }
            | RegistryError::Authentication { folder, .. }
            | RegistryError::Service { folder, .. } => Some(folder),
            RegistryError::Connection(_) | RegistryError::Validation(_) => None,
        }
    }

    /// Task the failed operation addressed, if any
    pub fn task_name(&self) -> Option<&str> {
        match self {
            RegistryError::NotFound { name, .. }
            | RegistryError::Registration { name, .. }
            | RegistryError::Authentication { name, .. } => Some(name),
            RegistryError::Service { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}
