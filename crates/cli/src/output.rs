// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use schedctl_core::RegisteredTask;
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + std::fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => print_json(value),
    }
}

/// Print tasks as a table, or as a JSON array
pub fn print_tasks(tasks: &[RegisteredTask], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!(
                "{:<30} {:<10} {:<20} {}",
                "NAME", "STATE", "NEXT RUN", "PATH"
            );
            for task in tasks {
                println!("{}", task);
            }
        }
        OutputFormat::Json => print_json(&tasks),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}
