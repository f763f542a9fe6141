// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `schedctl delete` - Remove a task

use super::Context;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct DeleteArgs {
    /// Task name
    #[arg(long)]
    pub name: String,

    /// Folder holding the task
    #[arg(long)]
    pub folder: Option<String>,
}

pub fn handle(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let folder = ctx.folder(args.folder.as_deref())?;
    ctx.registry.delete(&args.name, &folder)?;
    println!("Deleted {}", folder.task_path(&args.name));
    Ok(())
}
