// CLI argument definitions using Clap

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// Replay a test run's lifecycle events through the live progress reporter
#[derive(Parser, Debug)]
#[command(name = "runbar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Live progress bar for test runs, printing failures as they happen",
    long_about = None
)]
pub struct Cli {
    /// File with newline-delimited JSON events (reads stdin when omitted)
    #[arg(value_name = "EVENTS_FILE")]
    pub events: Option<PathBuf>,

    /// Configuration file to use instead of the default locations
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(short = 'c', long, default_value_t = false)]
    pub no_color: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub show_config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print the shell completion script
    #[arg(long, value_name = "SHELL_TYPE", value_parser = clap::value_parser!(Shell))]
    pub completion: Option<Shell>,
}

impl Cli {
    /// Whether events come from standard input
    pub fn reads_stdin(&self) -> bool {
        self.events
            .as_deref()
            .is_none_or(|path| path.as_os_str() == "-")
    }
}
