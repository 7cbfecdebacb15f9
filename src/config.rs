// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env::CiEnvironment;
use crate::error::{ReportError, Result};
use crate::report::color::ColorPalette;
use crate::report::renderer::BarOptions;
use crate::report::ticker::AUTO_REFRESH_INTERVAL;

pub const CONFIG_FILE_NAME: &str = ".runbarrc.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub colors: ColorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressConfig {
    /// Display options layered over the built-in bar defaults
    #[serde(default)]
    pub bar: BarOptions,

    /// Redraw the bar once per second while an example runs
    #[serde(default)]
    pub auto_refresh: bool,

    /// Print the pending summary at the end of the run
    #[serde(default = "default_true")]
    pub output_pending_results: bool,

    /// Print each distinct failure only once per run
    #[serde(default = "default_true")]
    pub deduplicate_failures: bool,

    /// Treat the output as interactive (or not) regardless of detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tty: Option<bool>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            bar: BarOptions::default(),
            auto_refresh: false,
            output_pending_results: true,
            deduplicate_failures: true,
            tty: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorsConfig {
    /// Global color switch
    #[serde(default = "default_color")]
    pub enabled: bool,

    #[serde(flatten)]
    pub palette: ColorPalette,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_color(),
            palette: ColorPalette::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_color() -> bool {
    console::colors_enabled()
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Result<Option<Self>> {
        // Check locations in order:
        // 1. .runbarrc.toml (current directory)
        // 2. ~/.runbarrc.toml (home directory)

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        for path in &paths {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load_from_file(path).map(Some);
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::ConfigRead {
            path: PathBuf::from(path),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

/// Read-only snapshot the reporter works from
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterSettings {
    pub bar: BarOptions,
    pub auto_refresh: bool,
    pub auto_refresh_interval: Duration,
    pub output_pending_results: bool,
    pub deduplicate_failures: bool,
    pub color_enabled: bool,
    pub palette: ColorPalette,
    pub ci: CiEnvironment,
}

impl ReporterSettings {
    pub fn from_config(config: &Config, ci: CiEnvironment) -> Self {
        Self {
            bar: config.progress.bar.clone(),
            auto_refresh: config.progress.auto_refresh,
            auto_refresh_interval: AUTO_REFRESH_INTERVAL,
            output_pending_results: config.progress.output_pending_results,
            deduplicate_failures: config.progress.deduplicate_failures,
            color_enabled: config.colors.enabled,
            palette: config.colors.palette.clone(),
            ci,
        }
    }
}

impl Default for ReporterSettings {
    fn default() -> Self {
        Self::from_config(&Config::default(), CiEnvironment::default())
    }
}
