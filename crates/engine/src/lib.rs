// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! schedctl task registry
//!
//! Validates requests, resolves folders and drives the scheduler service.
//! Every operation opens its own session and drops it before returning.

mod error;
mod folder;
mod registry;

pub use error::RegistryError;
pub use folder::FolderResolver;
pub use registry::{PreparedTask, TaskRegistry};
