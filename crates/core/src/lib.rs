// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! schedctl-core: domain model for managing scheduled tasks
//!
//! This crate provides:
//! - Validated folder paths for the scheduler namespace
//! - Task parameters, logon credentials and run levels
//! - Trigger construction with wall-clock defaults
//! - Task definition assembly
//! - Records of tasks as reported by the scheduler service
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod definition;
pub mod error;
pub mod folder;
pub mod params;
pub mod task;
pub mod trigger;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, LogConfig};
pub use definition::{
    ExecAction, InstancesPolicy, Principal, RegistrationInfo, TaskDefinition,
    TaskDefinitionBuilder, TaskSettings,
};
pub use error::ValidationError;
pub use folder::FolderPath;
pub use params::{Credentials, LogonKind, RunLevel, TaskParams};
pub use task::{RegisteredTask, TaskState};
pub use trigger::{TriggerFactory, TriggerKind, TriggerSpec, DEFAULT_START_DELAY, TIME_FORMAT};
