// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folder paths in the scheduler namespace
//!
//! Paths are absolute and `\`-delimited. The root folder is `\`.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '\\';
const FORBIDDEN: &[char] = &['/', ':', '*', '?', '"', '<', '>', '|'];

/// A validated, normalized folder path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// The root folder (`\`)
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and normalize a folder path.
    ///
    /// Accepts a single trailing separator (`\Jobs\` is `\Jobs`).
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFolderPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = path.strip_prefix(SEPARATOR) else {
            return Err(invalid("must start with '\\'"));
        };
        if rest.is_empty() {
            return Ok(Self::root());
        }
        if rest.starts_with(SEPARATOR) {
            return Err(invalid("must be rooted at a single '\\'"));
        }
        let rest = rest.strip_suffix(SEPARATOR).unwrap_or(rest);

        let mut segments = Vec::new();
        for segment in rest.split(SEPARATOR) {
            validate_segment(segment).map_err(|reason| invalid(&reason))?;
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments below the root, in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Leaf segment name, `None` for the root
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Parent folder, `None` for the root
    pub fn parent(&self) -> Option<FolderPath> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Child folder with one more segment
    pub fn join(&self, segment: &str) -> Result<FolderPath, ValidationError> {
        validate_segment(segment).map_err(|reason| ValidationError::InvalidFolderPath {
            path: format!("{}{}", self.with_trailing_separator(), segment),
            reason,
        })?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// Every folder from the first segment down to this one.
    ///
    /// `\A\B` yields `\A`, `\A\B`. The root yields nothing.
    pub fn ancestry(&self) -> impl Iterator<Item = FolderPath> + '_ {
        (1..=self.segments.len()).map(|depth| Self {
            segments: self.segments[..depth].to_vec(),
        })
    }

    /// Full path of a task named `name` inside this folder
    pub fn task_path(&self, name: &str) -> String {
        format!("{}{}", self.with_trailing_separator(), name)
    }

    fn with_trailing_separator(&self) -> String {
        if self.is_root() {
            SEPARATOR.to_string()
        } else {
            format!("{self}{SEPARATOR}")
        }
    }
}

fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("empty folder name".to_string());
    }
    if segment.trim() != segment {
        return Err(format!("folder name '{segment}' has surrounding whitespace"));
    }
    if segment == "." || segment == ".." {
        return Err(format!("folder name '{segment}' is reserved"));
    }
    if let Some(c) = segment.chars().find(|c| FORBIDDEN.contains(c) || c.is_control()) {
        return Err(format!("folder name '{segment}' contains '{}'", c.escape_default()));
    }
    Ok(())
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FolderPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FolderPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FolderPath> for String {
    fn from(path: FolderPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "folder_tests.rs"]
mod tests;
