// Console color codes and status palette

use serde::{Deserialize, Serialize};

use crate::state::RunStatus;

/// Sequence that restores the terminal's default rendition
pub const RESET: &str = "\x1b[0m";

/// Named VT100 colors accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorName {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BoldBlack,
    BoldRed,
    BoldGreen,
    BoldYellow,
    BoldBlue,
    BoldMagenta,
    BoldCyan,
    BoldWhite,
    Bold,
}

impl ColorName {
    pub fn code(self) -> &'static str {
        match self {
            Self::Black => "30",
            Self::Red => "31",
            Self::Green => "32",
            Self::Yellow => "33",
            Self::Blue => "34",
            Self::Magenta => "35",
            Self::Cyan => "36",
            Self::White => "37",
            Self::BoldBlack => "1;30",
            Self::BoldRed => "1;31",
            Self::BoldGreen => "1;32",
            Self::BoldYellow => "1;33",
            Self::BoldBlue => "1;34",
            Self::BoldMagenta => "1;35",
            Self::BoldCyan => "1;36",
            Self::BoldWhite => "1;37",
            Self::Bold => "1",
        }
    }
}

/// A configured color: either a name or a raw SGR code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConsoleColor {
    Named(ColorName),
    Code(u8),
}

impl ConsoleColor {
    pub fn sgr_code(&self) -> String {
        match self {
            Self::Named(name) => name.code().to_string(),
            Self::Code(code) => code.to_string(),
        }
    }

    /// Escape sequence that switches this color on
    pub fn escape(&self) -> String {
        format!("\x1b[{}m", self.sgr_code())
    }
}

impl From<ColorName> for ConsoleColor {
    fn from(name: ColorName) -> Self {
        Self::Named(name)
    }
}

/// Semantic colors for the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    #[serde(default = "default_success")]
    pub success: ConsoleColor,

    #[serde(default = "default_pending")]
    pub pending: ConsoleColor,

    #[serde(default = "default_failure")]
    pub failure: ConsoleColor,

    /// Color for host text around the bar. The reporter only colors the bar
    /// itself, so this is carried for callers and never drawn here.
    #[serde(default = "default_text")]
    pub default: ConsoleColor,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            success: default_success(),
            pending: default_pending(),
            failure: default_failure(),
            default: default_text(),
        }
    }
}

impl ColorPalette {
    pub fn for_status(&self, status: RunStatus) -> ConsoleColor {
        match status {
            RunStatus::Success => self.success,
            RunStatus::Pending => self.pending,
            RunStatus::Failure => self.failure,
        }
    }
}

fn default_success() -> ConsoleColor {
    ColorName::Green.into()
}

fn default_pending() -> ConsoleColor {
    ColorName::Yellow.into()
}

fn default_failure() -> ConsoleColor {
    ColorName::Red.into()
}

fn default_text() -> ConsoleColor {
    ColorName::White.into()
}

/// Colors are drawn only for an interactive destination outside CI
pub fn color_enabled(configured: bool, is_tty: bool, continuous_integration: bool) -> bool {
    configured && is_tty && !continuous_integration
}
