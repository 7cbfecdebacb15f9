// Commands module - handles CLI command execution

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

pub mod replay;

pub use replay::{ReplaySummary, replay_events};

/// Write the completion script for `shell` into `out`
pub fn handle_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}
