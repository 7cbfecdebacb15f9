// Background auto-refresh for long-running examples

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

/// Interval between automatic redraws
pub const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic task calling `tick` until cancelled.
///
/// Cancelling disconnects the channel the worker sleeps on, so a worker in the
/// middle of its wait wakes immediately instead of finishing the interval.
pub struct AutoRefresh {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    pub fn spawn<F>(interval: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (shutdown, wakeup) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("runbar-refresh".to_string())
            .spawn(move || {
                loop {
                    match wakeup.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => tick(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("Auto-refresh stopped");
            })?;

        Ok(Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Must not be called while holding a lock that `tick` takes.
    pub fn cancel(&mut self) {
        drop(self.shutdown.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Auto-refresh worker panicked");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.cancel();
    }
}
