// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `schedctl register` - Create or replace a task

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, ValueEnum};
use schedctl_core::{FolderPath, LogonKind, RunLevel, TaskParams};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogonArg {
    /// Run as you, only while you are logged on
    Interactive,
    /// Run as --username with --password, logged on or not
    Password,
    /// Run as a service account (--username, default SYSTEM)
    Service,
}

impl From<LogonArg> for LogonKind {
    fn from(arg: LogonArg) -> Self {
        match arg {
            LogonArg::Interactive => LogonKind::Interactive,
            LogonArg::Password => LogonKind::Password,
            LogonArg::Service => LogonKind::ServiceAccount,
        }
    }
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Task name, unique within its folder
    #[arg(long)]
    pub name: String,

    /// Executable to run
    #[arg(long)]
    pub exe: PathBuf,

    /// Arguments passed to the executable
    #[arg(long = "args", value_name = "ARGS", allow_hyphen_values = true)]
    pub arguments: Option<String>,

    /// Folder holding the task, e.g. \Jobs\Nightly
    #[arg(long)]
    pub folder: Option<String>,

    /// Trigger kind: daily, once or logon (case-insensitive)
    #[arg(long, value_name = "daily|once|logon")]
    pub trigger: String,

    /// Start time as YYYY-mm-ddTHH:MM:SS (default: shortly from now)
    #[arg(long)]
    pub at: Option<String>,

    /// Working directory for the executable
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Run with highest privileges
    #[arg(long)]
    pub highest: bool,

    /// Wake the computer to run the task
    #[arg(long)]
    pub wake: bool,

    /// Skip missed runs instead of starting them as soon as possible
    #[arg(long)]
    pub no_start_when_available: bool,

    /// Identity the task runs as
    #[arg(long, value_enum, default_value_t = LogonArg::Interactive)]
    pub logon: LogonArg,

    /// Account for password or service logon
    #[arg(long)]
    pub username: Option<String>,

    /// Password for password logon
    #[arg(long)]
    pub password: Option<String>,

    /// Validate and print the definition without registering it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RegisterArgs {
    fn params(&self, folder: FolderPath) -> TaskParams {
        let mut params = TaskParams::new(self.name.clone(), self.exe.clone())
            .with_folder(folder)
            .with_logon(
                self.logon.into(),
                self.username.clone(),
                self.password.clone(),
            );
        if let Some(arguments) = &self.arguments {
            params = params.with_arguments(arguments.clone());
        }
        if let Some(dir) = &self.workdir {
            params = params.with_working_dir(dir.clone());
        }
        if self.highest {
            params = params.with_run_level(RunLevel::Highest);
        }
        params.wake_to_run = self.wake;
        params.start_when_available = !self.no_start_when_available;
        params
    }
}

pub fn handle(ctx: &Context, args: RegisterArgs) -> Result<()> {
    let folder = ctx.folder(args.folder.as_deref())?;
    let params = args.params(folder);

    if args.dry_run {
        let prepared = ctx
            .registry
            .prepare(&params, &args.trigger, args.at.as_deref())?;
        output::print(&prepared, args.format);
        return Ok(());
    }

    let task = ctx
        .registry
        .register(&params, &args.trigger, args.at.as_deref())?;

    match args.format {
        OutputFormat::Text => println!(
            "Registered {} (state: {}, next run: {})",
            task.path,
            task.state,
            task.next_run_display()
        ),
        OutputFormat::Json => output::print_json(&task),
    }
    Ok(())
}
