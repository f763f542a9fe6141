// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell completion generation for the schedctl CLI.
//!
//! Completions cover every subcommand and flag, including the `--logon`
//! and `--format` values. Generation never reads the config file, so a
//! broken config does not block installing completions.
//!
//! Install completions using:
//!
//! ```bash
//! # Bash
//! schedctl completions bash > ~/.local/share/bash-completion/completions/schedctl
//!
//! # Zsh
//! schedctl completions zsh > ~/.zfunc/_schedctl
//!
//! # PowerShell
//! schedctl completions powershell > $PROFILE.CurrentUserAllHosts
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

/// Generate shell completions and write to stdout.
pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

/// Arguments for the completions command.
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
