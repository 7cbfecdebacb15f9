// Report module - live progress reporting for test runs

pub mod color;
pub mod event;
pub mod output;
pub mod progress;
pub mod renderer;
pub mod ticker;

pub use color::{ColorName, ColorPalette, ConsoleColor};
pub use event::RunEvent;
pub use output::{Output, SharedBuffer};
pub use progress::RunProgressReporter;
pub use renderer::{
    BarOptions, IndicatifRenderer, ProgressRenderer, RendererFactory, RendererOptions,
};
pub use ticker::AutoRefresh;

use crate::error::Result;
use crate::state::{ExampleId, FailedExample};

/// Receiver of test-run lifecycle events
pub trait Reporter: Send + Sync {
    /// Called once per run with the number of examples expected
    fn start(&self, count: u64) -> Result<()>;

    fn example_passed(&self) -> Result<()>;

    fn example_pending(&self) -> Result<()>;

    fn example_failed(&self, failure: &FailedExample) -> Result<()>;

    /// Free-form text from the runner
    fn message(&self, text: &str) -> Result<()>;

    fn dump_pending(&self, pending: &[ExampleId], formatted: &str) -> Result<()>;

    fn dump_failures(&self) -> Result<()>;

    fn dump_summary(&self, formatted: &str) -> Result<()>;

    fn seed(&self, seed_used: bool, formatted: &str) -> Result<()>;

    /// Called when the run is over
    fn close(&self) -> Result<()>;

    /// Dispatch an event to the matching callback
    fn handle(&self, event: &RunEvent) -> Result<()> {
        match event {
            RunEvent::Start { count } => self.start(*count),
            RunEvent::ExamplePassed => self.example_passed(),
            RunEvent::ExamplePending => self.example_pending(),
            RunEvent::ExampleFailed { example, formatted } => {
                self.example_failed(&FailedExample::new(example.clone(), formatted.clone()))
            }
            RunEvent::Message { message } => self.message(message),
            RunEvent::DumpPending {
                pending_examples,
                formatted,
            } => self.dump_pending(pending_examples, formatted),
            RunEvent::DumpFailures => self.dump_failures(),
            RunEvent::DumpSummary { formatted } => self.dump_summary(formatted),
            RunEvent::Seed {
                seed_used,
                formatted,
            } => self.seed(*seed_used, formatted),
            RunEvent::Close => self.close(),
        }
    }
}
