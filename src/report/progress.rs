// Progress bar reporter - immediate failures, color-coded bar

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::Reporter;
use super::color::{self, RESET};
use super::output::Output;
use super::renderer::{ProgressRenderer, RendererFactory, RendererOptions, indicatif_factory};
use super::ticker::AutoRefresh;
use crate::config::ReporterSettings;
use crate::error::Result;
use crate::state::{ExampleId, FailedExample, RunState, RunStatus};

/// Reporter driving a single progress bar.
///
/// Counters keep working before `start` and after `close`; drawing is skipped
/// while no bar exists.
pub struct RunProgressReporter {
    inner: Arc<Mutex<ReporterInner>>,
    auto_refresh: Mutex<Option<AutoRefresh>>,
}

struct ReporterInner {
    settings: ReporterSettings,
    output: Output,
    state: RunState,
    progress: Option<Box<dyn ProgressRenderer>>,
    make_renderer: RendererFactory,
}

impl RunProgressReporter {
    /// Create a reporter drawing an indicatif bar into `output`
    pub fn new(settings: ReporterSettings, output: Output) -> Self {
        Self::with_renderer_factory(settings, output, indicatif_factory())
    }

    pub fn with_renderer_factory(
        settings: ReporterSettings,
        output: Output,
        make_renderer: RendererFactory,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ReporterInner {
                settings,
                output,
                state: RunState::new(),
                progress: None,
                make_renderer,
            })),
            auto_refresh: Mutex::new(None),
        }
    }

    pub fn passed_count(&self) -> u64 {
        self.lock().state.passed()
    }

    pub fn pending_count(&self) -> u64 {
        self.lock().state.pending()
    }

    pub fn failed_count(&self) -> u64 {
        self.lock().state.failed()
    }

    /// Outcome events seen since the last `start`
    pub fn processed_count(&self) -> u64 {
        self.lock().state.processed()
    }

    pub fn status(&self) -> RunStatus {
        self.lock().state.status()
    }

    /// Current bar position, or `None` before the first `start`
    pub fn progress_position(&self) -> Option<u64> {
        self.lock().progress.as_ref().map(|p| p.position())
    }

    /// Whether render operations are wrapped in color sequences
    pub fn color_enabled(&self) -> bool {
        self.lock().color_enabled()
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh_slot().as_ref().is_some_and(AutoRefresh::is_running)
    }

    fn lock(&self) -> MutexGuard<'_, ReporterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh_slot(&self) -> MutexGuard<'_, Option<AutoRefresh>> {
        self.auto_refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn start_auto_refresh(&self) -> Result<()> {
        let interval = self.lock().settings.auto_refresh_interval;
        let inner = Arc::clone(&self.inner);
        let refresh = AutoRefresh::spawn(interval, move || {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = inner.refresh() {
                warn!("Auto-refresh failed: {}", e);
            }
        })?;

        *self.refresh_slot() = Some(refresh);
        Ok(())
    }

    // The worker takes the state lock on every tick, so it has to be joined
    // before that lock is held here.
    fn stop_auto_refresh(&self) {
        let previous = self.refresh_slot().take();
        if let Some(mut refresh) = previous {
            refresh.cancel();
        }
    }
}

impl ReporterInner {
    fn color_enabled(&self) -> bool {
        color::color_enabled(
            self.settings.color_enabled,
            self.output.is_tty(),
            self.settings.ci.is_ci(),
        )
    }

    /// Run a render operation wrapped in the color for the current status
    fn with_current_color<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(&mut dyn ProgressRenderer),
    {
        let color = self
            .color_enabled()
            .then(|| self.settings.palette.for_status(self.state.status()));
        let Some(progress) = self.progress.as_deref_mut() else {
            return Ok(());
        };

        match color {
            Some(color) => {
                self.output.print(&color.escape())?;
                op(progress);
                self.output.print(RESET)?;
            }
            None => op(progress),
        }
        Ok(())
    }

    fn increment(&mut self) -> Result<()> {
        // An empty run has nothing to advance
        if self.progress.as_ref().is_none_or(|p| p.total() == 0) {
            return Ok(());
        }
        self.with_current_color(|p| p.increment())
    }

    fn refresh(&mut self) -> Result<()> {
        self.with_current_color(|p| p.refresh())
    }

    /// Print a failure block with the bar line cleared around it
    fn print_failure(&mut self, text: &str) -> Result<()> {
        let output = self.output.clone();
        let mut write = || -> io::Result<()> {
            output.puts(text)?;
            output.puts("")
        };

        match self.progress.as_deref_mut() {
            Some(progress) => progress.suspend(&mut write)?,
            None => write()?,
        }
        Ok(())
    }
}

impl Reporter for RunProgressReporter {
    fn start(&self, count: u64) -> Result<()> {
        self.stop_auto_refresh();

        let auto_refresh = {
            let mut guard = self.lock();
            let inner = &mut *guard;

            inner.state.reset(count);
            let options =
                RendererOptions::resolve(&inner.settings.bar, inner.settings.ci.is_ci(), count)
                    .with_colors(inner.color_enabled());
            inner.progress = Some((inner.make_renderer)(&options, inner.output.clone()));
            debug!(
                "Run started: {} example(s), {} Hz redraw",
                count,
                options.refresh_hz()
            );

            inner.with_current_color(|p| p.start())?;
            inner.settings.auto_refresh
        };

        if auto_refresh {
            self.start_auto_refresh()?;
        }
        Ok(())
    }

    fn example_passed(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.state.record_passed();
        inner.increment()
    }

    fn example_pending(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.state.record_pending();
        inner.increment()
    }

    fn example_failed(&self, failure: &FailedExample) -> Result<()> {
        let mut inner = self.lock();
        let first_seen = inner.state.record_failed(&failure.example);

        if first_seen || !inner.settings.deduplicate_failures {
            inner.print_failure(&failure.formatted)?;
        } else {
            debug!(
                "Failure already printed this run: {}",
                failure.example.dedup_key()
            );
        }

        inner.increment()
    }

    fn message(&self, text: &str) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        match inner.progress.as_deref_mut() {
            Some(progress) if progress.supports_log() => progress.log(text),
            _ => inner.output.puts(text)?,
        }
        Ok(())
    }

    fn dump_pending(&self, pending: &[ExampleId], formatted: &str) -> Result<()> {
        let inner = self.lock();
        if !inner.settings.output_pending_results || pending.is_empty() {
            return Ok(());
        }

        inner.output.puts("")?;
        inner.output.puts(formatted)?;
        Ok(())
    }

    fn dump_failures(&self) -> Result<()> {
        // Failures were printed as they happened
        Ok(())
    }

    fn dump_summary(&self, formatted: &str) -> Result<()> {
        let inner = self.lock();
        inner.output.puts("")?;
        inner.output.puts(formatted)?;
        Ok(())
    }

    fn seed(&self, seed_used: bool, formatted: &str) -> Result<()> {
        if seed_used {
            self.lock().output.puts(formatted)?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.stop_auto_refresh();

        let mut inner = self.lock();
        if let Some(progress) = inner.progress.as_deref_mut() {
            progress.stop();
        }
        debug!(
            "Run closed: {} passed, {} pending, {} failed",
            inner.state.passed(),
            inner.state.pending(),
            inner.state.failed()
        );
        Ok(())
    }
}
