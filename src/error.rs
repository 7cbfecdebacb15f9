// Error types for the reporter library

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the reporter and its configuration layer
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output sink rejected a write. There is no recovery path for a broken sink.
    #[error("failed to write progress output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
