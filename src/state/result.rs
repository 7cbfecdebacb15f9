// Example identity and failure notifications

use serde::{Deserialize, Serialize};

/// Identity of a reported example: where it lives and what it says
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExampleId {
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl ExampleId {
    pub fn new(location: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            description: description.into(),
        }
    }

    /// Key used to suppress repeated printing of the same failure within a run
    pub fn dedup_key(&self) -> String {
        format!("{}:{}", self.location, self.description)
    }
}

/// A failed example with its caller-formatted failure text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedExample {
    pub example: ExampleId,
    pub formatted: String,
}

impl FailedExample {
    pub fn new(example: ExampleId, formatted: impl Into<String>) -> Self {
        Self {
            example,
            formatted: formatted.into(),
        }
    }
}
