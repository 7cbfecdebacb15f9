// Progress bar rendering on top of indicatif

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io;

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle, TermLike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::output::Output;

/// Built-in bar layout: ` 3/10 |=====>     | 12s `
pub const DEFAULT_TEMPLATE: &str = " {pos}/{len} |{wide_bar}| {eta} ";

pub const DEFAULT_PROGRESS_CHARS: &str = "=> ";

/// Seconds between redraws when running under CI
pub const CI_THROTTLE_RATE: f64 = 1.0;

const DEFAULT_REFRESH_HZ: u8 = 20;
const FALLBACK_WIDTH: u16 = 80;

/// Display options for the bar. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_chars: Option<String>,

    /// Minimum seconds between two redraws
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle_rate: Option<f64>,

    /// Fixed bar width in columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,

    /// Options this renderer does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl BarOptions {
    pub fn builtin() -> Self {
        Self {
            template: Some(DEFAULT_TEMPLATE.to_string()),
            progress_chars: Some(DEFAULT_PROGRESS_CHARS.to_string()),
            ..Self::default()
        }
    }

    /// Layer `over` on top of `self`; set fields in `over` win
    pub fn merge(mut self, over: &BarOptions) -> Self {
        if over.template.is_some() {
            self.template.clone_from(&over.template);
        }
        if over.progress_chars.is_some() {
            self.progress_chars.clone_from(&over.progress_chars);
        }
        if over.throttle_rate.is_some() {
            self.throttle_rate = over.throttle_rate;
        }
        if over.width.is_some() {
            self.width = over.width;
        }
        self.extra
            .extend(over.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

/// Fully resolved options handed to a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RendererOptions {
    pub display: BarOptions,
    pub total: u64,
    pub autostart: bool,
    /// Keep template styles (`{bar:.green}`) in the drawn bar
    pub colored: bool,
}

impl RendererOptions {
    /// Built-in defaults, then configuration, then the per-run values.
    ///
    /// `total` and `autostart` are always forced. Under CI the throttle is pinned
    /// to [`CI_THROTTLE_RATE`] whatever the configuration says, and template
    /// styles are dropped.
    pub fn resolve(configured: &BarOptions, continuous_integration: bool, total: u64) -> Self {
        let mut display = BarOptions::builtin().merge(configured);
        if continuous_integration {
            display.throttle_rate = Some(CI_THROTTLE_RATE);
        }

        Self {
            display,
            total,
            autostart: false,
            colored: !continuous_integration,
        }
    }

    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Redraw frequency derived from the throttle rate
    pub fn refresh_hz(&self) -> u8 {
        match self.display.throttle_rate {
            None => DEFAULT_REFRESH_HZ,
            Some(secs) if secs > 0.0 => (1.0 / secs).round().clamp(1.0, f64::from(u8::MAX)) as u8,
            Some(_) => u8::MAX,
        }
    }
}

/// Operations the reporter needs from a progress bar
pub trait ProgressRenderer: Send {
    fn total(&self) -> u64;

    fn position(&self) -> u64;

    /// Draw the bar for the first time
    fn start(&mut self);

    /// Advance by one unit. Never moves past `total`.
    fn increment(&mut self);

    /// Redraw without changing position
    fn refresh(&mut self);

    /// Clear the bar line, run `f`, then redraw the bar below whatever `f` wrote
    fn suspend(&mut self, f: &mut dyn FnMut() -> io::Result<()>) -> io::Result<()>;

    /// Finish the bar, leaving its last state on screen
    fn stop(&mut self);

    /// Print a line above the bar
    fn log(&mut self, text: &str);

    fn supports_log(&self) -> bool {
        true
    }
}

/// Builds a renderer for each run
pub type RendererFactory =
    Box<dyn Fn(&RendererOptions, Output) -> Box<dyn ProgressRenderer> + Send>;

/// Default factory producing [`IndicatifRenderer`]s
pub fn indicatif_factory() -> RendererFactory {
    Box::new(
        |options: &RendererOptions, output: Output| -> Box<dyn ProgressRenderer> {
            Box::new(IndicatifRenderer::create(options, output))
        },
    )
}

/// `indicatif` bar drawing into an [`Output`]
pub struct IndicatifRenderer {
    bar: ProgressBar,
    total: u64,
}

impl IndicatifRenderer {
    pub fn create(options: &RendererOptions, output: Output) -> Self {
        let width = options.display.width.unwrap_or_else(|| terminal_width(&output));
        let term = BarTerm {
            output,
            width,
            colored: options.colored,
        };
        let target = ProgressDrawTarget::term_like_with_hz(Box::new(term), options.refresh_hz());

        let bar = ProgressBar::with_draw_target(Some(options.total), target);
        bar.set_style(build_style(&options.display));

        for key in options.display.extra.keys() {
            debug!("Progress bar option '{}' is not used by this renderer", key);
        }

        let mut renderer = Self {
            bar,
            total: options.total,
        };
        if options.autostart {
            renderer.start();
        }
        renderer
    }
}

impl ProgressRenderer for IndicatifRenderer {
    fn total(&self) -> u64 {
        self.total
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn start(&mut self) {
        self.bar.tick();
    }

    fn increment(&mut self) {
        if self.bar.position() < self.total {
            self.bar.inc(1);
        }
    }

    fn refresh(&mut self) {
        self.bar.tick();
    }

    fn suspend(&mut self, f: &mut dyn FnMut() -> io::Result<()>) -> io::Result<()> {
        self.bar.suspend(f)
    }

    fn stop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }

    fn log(&mut self, text: &str) {
        self.bar.println(text);
    }
}

fn build_style(display: &BarOptions) -> ProgressStyle {
    let template = display.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
    let style = match ProgressStyle::with_template(template) {
        Ok(style) => style,
        Err(e) => {
            warn!(
                "Invalid progress bar template '{}': {}. Using the default layout.",
                template, e
            );
            ProgressStyle::with_template(DEFAULT_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
        }
    };

    let chars = display
        .progress_chars
        .as_deref()
        .unwrap_or(DEFAULT_PROGRESS_CHARS);
    if chars.chars().count() >= 2 {
        style.progress_chars(chars)
    } else {
        warn!(
            "Progress chars '{}' need at least two characters. Using '{}'.",
            chars, DEFAULT_PROGRESS_CHARS
        );
        style.progress_chars(DEFAULT_PROGRESS_CHARS)
    }
}

fn terminal_width(output: &Output) -> u16 {
    if !output.is_tty() {
        return FALLBACK_WIDTH;
    }
    match Term::stdout().size_checked() {
        Some((_rows, cols)) if cols > 0 => cols,
        _ => FALLBACK_WIDTH,
    }
}

/// Terminal facade so indicatif draws into the reporter's sink
#[derive(Debug)]
struct BarTerm {
    output: Output,
    width: u16,
    colored: bool,
}

impl BarTerm {
    fn move_cursor(&self, n: usize, direction: char) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.output.print(&format!("\x1b[{}{}", n, direction))
    }

    // indicatif styles follow the process-wide console setting, not ours
    fn text<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.colored {
            Cow::Borrowed(s)
        } else {
            console::strip_ansi_codes(s)
        }
    }
}

impl TermLike for BarTerm {
    fn width(&self) -> u16 {
        self.width
    }

    fn move_cursor_up(&self, n: usize) -> io::Result<()> {
        self.move_cursor(n, 'A')
    }

    fn move_cursor_down(&self, n: usize) -> io::Result<()> {
        self.move_cursor(n, 'B')
    }

    fn move_cursor_right(&self, n: usize) -> io::Result<()> {
        self.move_cursor(n, 'C')
    }

    fn move_cursor_left(&self, n: usize) -> io::Result<()> {
        self.move_cursor(n, 'D')
    }

    fn write_line(&self, s: &str) -> io::Result<()> {
        self.output.puts(&self.text(s))
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        self.output.print(&self.text(s))
    }

    fn clear_line(&self) -> io::Result<()> {
        self.output.print("\r\x1b[2K")
    }

    fn flush(&self) -> io::Result<()> {
        self.output.flush()
    }
}
