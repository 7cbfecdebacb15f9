// Main entry point for runbar

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;
use tracing::info;

use runbar::cli::Cli;
use runbar::commands::{handle_completion, replay_events};
use runbar::config::{self, Config, ReporterSettings};
use runbar::env::{CiEnvironment, ENV_CI, ENV_CONTINUOUS_INTEGRATION};
use runbar::report::{Output, RunProgressReporter};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    runbar::logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting runbar v{}", env!("CARGO_PKG_VERSION"));
    }

    if let Some(shell) = cli.completion {
        handle_completion(shell, &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(config_file) = &cli.init_config {
        let toml_content = Config::default().to_toml();
        std::fs::write(config_file, toml_content)?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?.unwrap_or_default(),
    };
    if cli.no_color {
        config.colors.enabled = false;
    }

    let ci = CiEnvironment::from_env();

    if cli.show_config {
        show_config(&cli, &config, ci);
        return Ok(ExitCode::SUCCESS);
    }

    let output = Output::stdout().with_tty_override(config.progress.tty);
    let reporter = RunProgressReporter::new(ReporterSettings::from_config(&config, ci), output);

    let summary = match cli.events.as_deref() {
        Some(path) if !cli.reads_stdin() => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open events file {}", path.display()))?;
            replay_events(BufReader::new(file), &reporter)?
        }
        _ => replay_events(io::stdin().lock(), &reporter)?,
    };

    info!(
        "Replayed {} event(s): {} passed, {} pending, {} failed",
        summary.events, summary.passed, summary.pending, summary.failed
    );

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn show_config(cli: &Cli, config: &Config, ci: CiEnvironment) {
    println!("Current configuration:");
    match &cli.config {
        Some(path) => println!("  Source: {}", path.display()),
        None => println!("  Source: {} (or built-in defaults)", config::CONFIG_FILE_NAME),
    }

    println!("\n  Progress:");
    let bar = &config.progress.bar;
    if let Some(template) = &bar.template {
        println!("    Template: {:?}", template);
    }
    if let Some(rate) = bar.throttle_rate {
        println!("    Throttle rate: {}s", rate);
    }
    println!("    Auto refresh: {}", config.progress.auto_refresh);
    println!(
        "    Output pending results: {}",
        config.progress.output_pending_results
    );
    println!(
        "    Deduplicate failures: {}",
        config.progress.deduplicate_failures
    );

    let palette = &config.colors.palette;
    println!("\n  Colors:");
    println!(
        "    Enabled: {}",
        if config.colors.enabled {
            "yes"
        } else {
            "no"
        }
    );
    println!("    Success: {}", palette.success.sgr_code());
    println!("    Pending: {}", palette.pending.sgr_code());
    println!("    Failure: {}", palette.failure.sgr_code());
    println!("    Default: {}", palette.default.sgr_code());

    println!("\n  Environment:");
    println!(
        "    CI detected: {} (via {} or {} = \"true\")",
        ci.is_ci(),
        ENV_CI,
        ENV_CONTINUOUS_INTEGRATION
    );
}
