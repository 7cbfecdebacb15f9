// Inbound lifecycle events

use serde::{Deserialize, Serialize};

use crate::state::ExampleId;

/// One lifecycle notification from the test runner.
///
/// Serialized as a JSON object tagged by `"event"`, e.g.
/// `{"event": "start", "count": 12}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Start {
        count: u64,
    },
    ExamplePassed,
    ExamplePending,
    ExampleFailed {
        example: ExampleId,
        formatted: String,
    },
    Message {
        message: String,
    },
    DumpPending {
        #[serde(default)]
        pending_examples: Vec<ExampleId>,
        #[serde(default)]
        formatted: String,
    },
    DumpFailures,
    DumpSummary {
        formatted: String,
    },
    Seed {
        seed_used: bool,
        formatted: String,
    },
    Close,
}

impl RunEvent {
    pub fn failed(example: ExampleId, formatted: impl Into<String>) -> Self {
        Self::ExampleFailed {
            example,
            formatted: formatted.into(),
        }
    }
}
