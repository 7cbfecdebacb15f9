// Replay command - feed recorded events into the reporter

use anyhow::{Context, Result};
use std::io::BufRead;
use tracing::{debug, warn};

use crate::report::{Reporter, RunEvent, RunProgressReporter};

/// What a replay did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub passed: u64,
    pub pending: u64,
    pub failed: u64,
}

impl ReplaySummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Read newline-delimited JSON events and dispatch them in order.
///
/// Blank lines are skipped. A stream that ends without a `close` event is
/// closed here so the bar is always finished.
pub fn replay_events<R: BufRead>(
    reader: R,
    reporter: &RunProgressReporter,
) -> Result<ReplaySummary> {
    let mut events = 0;
    let mut closed = false;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read event line {}", line_no))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: RunEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", line_no))?;
        debug!("Event {}: {:?}", line_no, event);

        reporter
            .handle(&event)
            .with_context(|| format!("Failed to report event on line {}", line_no))?;

        events += 1;
        closed = matches!(event, RunEvent::Close);
    }

    if !closed {
        if events > 0 {
            warn!("Event stream ended without a close event");
        }
        reporter.close()?;
    }

    Ok(ReplaySummary {
        events,
        passed: reporter.passed_count(),
        pending: reporter.pending_count(),
        failed: reporter.failed_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReporterSettings;
    use crate::report::Output;
    use std::io::Cursor;

    fn reporter() -> (RunProgressReporter, crate::report::SharedBuffer) {
        let (output, buffer) = Output::buffer(false);
        (RunProgressReporter::new(ReporterSettings::default(), output), buffer)
    }

    #[test]
    fn test_replay_counts_events() {
        let (reporter, buffer) = reporter();
        let input = r#"
{"event": "start", "count": 3}
{"event": "example_passed"}
{"event": "example_pending"}

{"event": "example_failed", "example": {"location": "spec/a_spec.rb:3", "description": "adds"}, "formatted": "1) adds\n   expected 2, got 3"}
{"event": "dump_summary", "formatted": "3 examples, 1 failure, 1 pending"}
{"event": "close"}
"#;

        let summary = replay_events(Cursor::new(input), &reporter).expect("Replay failed");

        assert_eq!(summary.events, 6);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_passed());

        let output = buffer.contents();
        assert!(output.contains("expected 2, got 3"));
        assert!(output.contains("3 examples, 1 failure, 1 pending"));
    }

    #[test]
    fn test_replay_reports_bad_line() {
        let (reporter, _buffer) = reporter();
        let input = "{\"event\": \"start\", \"count\": 1}\n{\"event\": \"exploded\"}\n";

        let err = replay_events(Cursor::new(input), &reporter).unwrap_err();

        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_replay_empty_input() {
        let (reporter, buffer) = reporter();
        let summary = replay_events(Cursor::new(""), &reporter).expect("Replay failed");
        assert_eq!(summary.events, 0);
        assert!(summary.all_passed());
        assert_eq!(buffer.contents(), "");
    }
}
