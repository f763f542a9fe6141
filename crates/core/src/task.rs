// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tasks as reported by the scheduler service
//!
//! These records are read fresh from the service on every query. State
//! changes belong to the service's scheduling engine; this crate only
//! observes them.

use crate::trigger::TIME_FORMAT;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lifecycle state of a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Unknown,
    Disabled,
    Queued,
    Ready,
    Running,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Unknown => "Unknown",
            TaskState::Disabled => "Disabled",
            TaskState::Queued => "Queued",
            TaskState::Ready => "Ready",
            TaskState::Running => "Running",
        }
    }

    /// Whether the engine may still fire the task on its own
    pub fn is_schedulable(&self) -> bool {
        matches!(self, TaskState::Ready | TaskState::Queued | TaskState::Running)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The service's record of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredTask {
    pub name: String,
    /// Full path, e.g. `\Jobs\Nightly`
    pub path: String,
    pub state: TaskState,
    #[serde(serialize_with = "serialize_next_run")]
    pub next_run_time: Option<NaiveDateTime>,
}

impl RegisteredTask {
    pub fn next_run_display(&self) -> String {
        self.next_run_time
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// One listing row: name, state, next run, path
impl fmt::Display for RegisteredTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<30} {:<10} {:<20} {}",
            self.name,
            self.state,
            self.next_run_display(),
            self.path
        )
    }
}

fn serialize_next_run<S: Serializer>(
    value: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(t) => serializer.collect_str(&t.format(TIME_FORMAT)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
