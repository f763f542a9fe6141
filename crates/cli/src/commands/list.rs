// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `schedctl list` - Show the tasks in a folder

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct ListArgs {
    /// Folder to list
    #[arg(long)]
    pub folder: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn handle(ctx: &Context, args: ListArgs) -> Result<()> {
    let folder = ctx.folder(args.folder.as_deref())?;
    let mut tasks = ctx.registry.list(&folder)?;
    // The service reports tasks in no fixed order
    tasks.sort_by(|a, b| a.name.cmp(&b.name));

    if tasks.is_empty() && matches!(args.format, OutputFormat::Text) {
        println!("No tasks in {}", folder);
        return Ok(());
    }
    output::print_tasks(&tasks, args.format);
    Ok(())
}
