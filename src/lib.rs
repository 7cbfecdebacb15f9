pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod report;
pub mod state;

pub use config::{Config, ReporterSettings};
pub use env::CiEnvironment;
pub use error::{ReportError, Result};
pub use report::{Reporter, RunEvent, RunProgressReporter};
