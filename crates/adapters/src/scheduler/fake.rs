// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake scheduler service for testing
//!
//! Keeps an in-memory folder tree, records every call and computes next-run
//! times from a controllable clock.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SchedulerService, SchedulerSession, ServiceError};
use chrono::NaiveDateTime;
use schedctl_core::{
    Clock, Credentials, FakeClock, FolderPath, LogonKind, RegisteredTask, TaskDefinition,
    TaskState, TriggerSpec,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded scheduler call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCall {
    Connect,
    FolderExists {
        path: FolderPath,
    },
    CreateFolder {
        parent: FolderPath,
        name: String,
    },
    RegisterTask {
        folder: FolderPath,
        name: String,
        logon: LogonKind,
        user_id: Option<String>,
    },
    GetTask {
        folder: FolderPath,
        name: String,
    },
    RunTask {
        folder: FolderPath,
        name: String,
    },
    DeleteTask {
        folder: FolderPath,
        name: String,
    },
    ListTasks {
        folder: FolderPath,
    },
}

/// Fake registered task
#[derive(Debug, Clone)]
pub struct FakeTask {
    pub definition: TaskDefinition,
    pub credentials: Credentials,
    pub state: TaskState,
    pub run_count: u32,
}

/// Fake folder contents
#[derive(Debug, Clone, Default)]
pub struct FakeFolder {
    pub tasks: HashMap<String, FakeTask>,
}

#[derive(Debug)]
struct FakeState {
    folders: HashMap<FolderPath, FakeFolder>,
    calls: Vec<SchedulerCall>,
    unavailable: Option<String>,
    deny_folder_creation: bool,
    rejection: Option<String>,
    accounts: Option<HashMap<String, String>>,
}

impl Default for FakeState {
    fn default() -> Self {
        let mut folders = HashMap::new();
        folders.insert(FolderPath::root(), FakeFolder::default());
        Self {
            folders,
            calls: Vec::new(),
            unavailable: None,
            deny_folder_creation: false,
            rejection: None,
            accounts: None,
        }
    }
}

/// Fake scheduler service for testing
#[derive(Clone, Default)]
pub struct FakeScheduler {
    state: Arc<Mutex<FakeState>>,
    clock: FakeClock,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `clock` to compute next-run times
    pub fn with_clock(clock: FakeClock) -> Self {
        Self {
            state: Arc::default(),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.lock().calls.clone()
    }

    /// Number of calls that reached the service, including `connect`
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Folder paths created through `create_folder`, in order
    pub fn created_folders(&self) -> Vec<FolderPath> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                SchedulerCall::CreateFolder { parent, name } => parent.join(name).ok(),
                _ => None,
            })
            .collect()
    }

    pub fn has_folder(&self, path: &FolderPath) -> bool {
        self.lock().folders.contains_key(path)
    }

    /// Get a task by folder and name
    pub fn task(&self, folder: &FolderPath, name: &str) -> Option<FakeTask> {
        self.lock()
            .folders
            .get(folder)
            .and_then(|f| f.tasks.get(name))
            .cloned()
    }

    /// Make `connect` fail
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        self.lock().unavailable = Some(reason.into());
    }

    /// Make every folder creation fail with access denied
    pub fn deny_folder_creation(&self) {
        self.lock().deny_folder_creation = true;
    }

    /// Make every registration fail with the given reason
    pub fn reject_registrations(&self, reason: impl Into<String>) {
        self.lock().rejection = Some(reason.into());
    }

    /// Add an account that password logons are checked against.
    ///
    /// Once any account is added, unknown accounts and wrong passwords fail
    /// with a logon failure.
    pub fn add_account(&self, username: impl Into<String>, password: impl Into<String>) {
        self.lock()
            .accounts
            .get_or_insert_with(HashMap::new)
            .insert(username.into(), password.into());
    }

    /// Change a task's state, as an administrator or the engine would
    pub fn set_state(&self, folder: &FolderPath, name: &str, state: TaskState) {
        if let Some(task) = self
            .lock()
            .folders
            .get_mut(folder)
            .and_then(|f| f.tasks.get_mut(name))
        {
            task.state = state;
        }
    }

    fn record(&self, call: SchedulerCall) {
        self.lock().calls.push(call);
    }

    fn next_run(&self, trigger: Option<&TriggerSpec>, state: TaskState) -> Option<NaiveDateTime> {
        if !state.is_schedulable() {
            return None;
        }
        let now = self.clock.now();
        match trigger? {
            TriggerSpec::Daily { start_boundary } => {
                if *start_boundary >= now {
                    return Some(*start_boundary);
                }
                let elapsed_days = (now - *start_boundary).num_seconds().div_euclid(86_400);
                let mut next = *start_boundary + chrono::Duration::days(elapsed_days);
                if next < now {
                    next += chrono::Duration::days(1);
                }
                Some(next)
            }
            TriggerSpec::Once { run_at } => (*run_at >= now).then_some(*run_at),
            TriggerSpec::Logon => None,
        }
    }

    fn record_for(&self, folder: &FolderPath, name: &str, task: &FakeTask) -> RegisteredTask {
        RegisteredTask {
            name: name.to_string(),
            path: folder.task_path(name),
            state: task.state,
            next_run_time: self.next_run(task.definition.trigger.as_ref(), task.state),
        }
    }

    fn missing_task(folder: &FolderPath, name: &str) -> ServiceError {
        ServiceError::NotFound(folder.task_path(name))
    }

    fn missing_folder(folder: &FolderPath) -> ServiceError {
        ServiceError::NotFound(folder.to_string())
    }
}

impl SchedulerService for FakeScheduler {
    type Session = FakeSession;

    fn connect(&self) -> Result<FakeSession, ServiceError> {
        self.record(SchedulerCall::Connect);
        if let Some(reason) = self.lock().unavailable.clone() {
            return Err(ServiceError::Unavailable(reason));
        }
        Ok(FakeSession {
            scheduler: self.clone(),
        })
    }
}

/// Session over a [`FakeScheduler`]
pub struct FakeSession {
    scheduler: FakeScheduler,
}

impl SchedulerSession for FakeSession {
    fn folder_exists(&self, path: &FolderPath) -> Result<bool, ServiceError> {
        self.scheduler
            .record(SchedulerCall::FolderExists { path: path.clone() });
        Ok(self.scheduler.has_folder(path))
    }

    fn create_folder(&self, parent: &FolderPath, name: &str) -> Result<FolderPath, ServiceError> {
        self.scheduler.record(SchedulerCall::CreateFolder {
            parent: parent.clone(),
            name: name.to_string(),
        });

        let path = parent
            .join(name)
            .map_err(|e| ServiceError::Rejected(e.to_string()))?;
        let mut state = self.scheduler.lock();
        if state.deny_folder_creation {
            return Err(ServiceError::AccessDenied(path.to_string()));
        }
        if !state.folders.contains_key(parent) {
            return Err(FakeScheduler::missing_folder(parent));
        }
        if state.folders.contains_key(&path) {
            return Err(ServiceError::Rejected(format!("{path} already exists")));
        }
        state.folders.insert(path.clone(), FakeFolder::default());
        Ok(path)
    }

    fn register_task(
        &self,
        folder: &FolderPath,
        name: &str,
        definition: &TaskDefinition,
        credentials: &Credentials,
    ) -> Result<RegisteredTask, ServiceError> {
        self.scheduler.record(SchedulerCall::RegisterTask {
            folder: folder.clone(),
            name: name.to_string(),
            logon: credentials.logon_kind(),
            user_id: credentials.user_id().map(str::to_string),
        });

        let task = {
            let mut state = self.scheduler.lock();
            if let Some(reason) = &state.rejection {
                return Err(ServiceError::Rejected(reason.clone()));
            }
            if let (Credentials::Password { username, password }, Some(accounts)) =
                (credentials, &state.accounts)
            {
                if accounts.get(username) != Some(password) {
                    return Err(ServiceError::LogonFailure(format!(
                        "unknown user name or bad password for {username}"
                    )));
                }
            }
            let contents = state
                .folders
                .get_mut(folder)
                .ok_or_else(|| FakeScheduler::missing_folder(folder))?;

            let task = FakeTask {
                definition: definition.clone(),
                credentials: credentials.clone(),
                state: if definition.settings.enabled {
                    TaskState::Ready
                } else {
                    TaskState::Disabled
                },
                run_count: 0,
            };
            contents.tasks.insert(name.to_string(), task.clone());
            task
        };

        Ok(self.scheduler.record_for(folder, name, &task))
    }

    fn get_task(
        &self,
        folder: &FolderPath,
        name: &str,
    ) -> Result<Option<RegisteredTask>, ServiceError> {
        self.scheduler.record(SchedulerCall::GetTask {
            folder: folder.clone(),
            name: name.to_string(),
        });
        Ok(self
            .scheduler
            .task(folder, name)
            .map(|task| self.scheduler.record_for(folder, name, &task)))
    }

    fn run_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError> {
        self.scheduler.record(SchedulerCall::RunTask {
            folder: folder.clone(),
            name: name.to_string(),
        });

        let mut state = self.scheduler.lock();
        let task = state
            .folders
            .get_mut(folder)
            .and_then(|f| f.tasks.get_mut(name))
            .ok_or_else(|| FakeScheduler::missing_task(folder, name))?;
        if task.state == TaskState::Disabled {
            return Err(ServiceError::Rejected(format!(
                "{} is disabled",
                folder.task_path(name)
            )));
        }
        task.state = TaskState::Running;
        task.run_count += 1;
        Ok(())
    }

    fn delete_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError> {
        self.scheduler.record(SchedulerCall::DeleteTask {
            folder: folder.clone(),
            name: name.to_string(),
        });

        let mut state = self.scheduler.lock();
        state
            .folders
            .get_mut(folder)
            .and_then(|f| f.tasks.remove(name))
            .map(|_| ())
            .ok_or_else(|| FakeScheduler::missing_task(folder, name))
    }

    fn list_tasks(&self, folder: &FolderPath) -> Result<Vec<RegisteredTask>, ServiceError> {
        self.scheduler.record(SchedulerCall::ListTasks {
            folder: folder.clone(),
        });

        let tasks: Vec<(String, FakeTask)> = {
            let state = self.scheduler.lock();
            let contents = state
                .folders
                .get(folder)
                .ok_or_else(|| FakeScheduler::missing_folder(folder))?;
            contents
                .tasks
                .iter()
                .map(|(name, task)| (name.clone(), task.clone()))
                .collect()
        };

        Ok(tasks
            .iter()
            .map(|(name, task)| self.scheduler.record_for(folder, name, task))
            .collect())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
