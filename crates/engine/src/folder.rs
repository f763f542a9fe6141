// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folder resolution: find a folder, creating any missing segments

use crate::error::RegistryError;
use schedctl_adapters::SchedulerSession;
use schedctl_core::FolderPath;

/// Resolves folder paths against an open session
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderResolver;

impl FolderResolver {
    pub fn new() -> Self {
        Self
    }

    /// Make sure every segment of `path` exists, creating the absent ones
    /// from the top down. The root always exists.
    ///
    /// Returns the resolved folder. A repeat call creates nothing.
    pub fn resolve<T: SchedulerSession>(
        &self,
        session: &T,
        path: &FolderPath,
    ) -> Result<FolderPath, RegistryError> {
        let fail = |reason| RegistryError::FolderResolution {
            path: path.clone(),
            reason,
        };

        let mut created = 0;
        for folder in path.ancestry() {
            if session.folder_exists(&folder).map_err(fail)? {
                continue;
            }
            let (Some(parent), Some(name)) = (folder.parent(), folder.name()) else {
                continue;
            };
            session.create_folder(&parent, name).map_err(fail)?;
            tracing::info!(folder = %folder, "created folder");
            created += 1;
        }

        tracing::debug!(folder = %path, created, "resolved folder");
        Ok(path.clone())
    }
}

#[cfg(test)]
#[path = "folder_tests.rs"]
mod tests;
