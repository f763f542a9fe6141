// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! schedctl - manage tasks in the system task scheduler

mod commands;
mod completions;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{delete, list, register, run, Context};
use completions::CompletionsArgs;
use schedctl_core::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "schedctl",
    version,
    about = "schedctl - Register, run and remove scheduled tasks"
)]
struct Cli {
    /// Configuration file (defaults to $SCHEDCTL_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task, or replace one with the same name
    Register(register::RegisterArgs),
    /// Start a task now
    Run(run::RunArgs),
    /// Delete a task
    Delete(delete::DeleteArgs),
    /// List the tasks in a folder
    List(list::ListArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Completions need neither config nor the scheduler
    if let Commands::Completions(args) = &cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return ExitCode::SUCCESS;
    }

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", error::render(&e));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let _log_guard = logging::init(&config.log)?;
    let ctx = Context::new(&config);

    let result = match cli.command {
        Commands::Register(args) => register::handle(&ctx, args),
        Commands::Run(args) => run::handle(&ctx, args),
        Commands::Delete(args) => delete::handle(&ctx, args),
        Commands::List(args) => list::handle(&ctx, args),
        Commands::Completions(_) => Ok(()),
    };

    if let Err(e) = &result {
        tracing::debug!(error = %format!("{e:#}"), "command failed");
    }
    result
}
