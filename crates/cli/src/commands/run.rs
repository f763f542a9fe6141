// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `schedctl run` - Start a task now

use super::Context;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct RunArgs {
    /// Task name
    #[arg(long)]
    pub name: String,

    /// Folder holding the task
    #[arg(long)]
    pub folder: Option<String>,
}

pub fn handle(ctx: &Context, args: RunArgs) -> Result<()> {
    let folder = ctx.folder(args.folder.as_deref())?;
    ctx.registry.run(&args.name, &folder)?;
    println!("Requested run of {}", folder.task_path(&args.name));
    Ok(())
}
