// Output sink shared by the progress bar and the reporter

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use console::Term;

/// Cloneable handle to a single output stream.
///
/// Every clone writes to the same sink, so bar redraws, color sequences and
/// failure text land in one ordered stream.
#[derive(Clone)]
pub struct Output {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    is_tty: bool,
}

impl Output {
    /// Standard output, with TTY detection from the attached terminal
    pub fn stdout() -> Self {
        let is_tty = Term::stdout().is_term();
        Self::from_writer(io::stdout(), is_tty)
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W, is_tty: bool) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            is_tty,
        }
    }

    /// In-memory output; the returned buffer sees everything written
    pub fn buffer(is_tty: bool) -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::from_writer(buffer.clone(), is_tty), buffer)
    }

    /// Replace detected interactivity with a configured answer
    pub fn with_tty_override(mut self, tty: Option<bool>) -> Self {
        if let Some(tty) = tty {
            self.is_tty = tty;
        }
        self
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Write text as-is and flush
    pub fn print(&self, text: &str) -> io::Result<()> {
        let mut sink = self.lock();
        sink.write_all(text.as_bytes())?;
        sink.flush()
    }

    /// Write text followed by a newline
    pub fn puts(&self, text: &str) -> io::Result<()> {
        let mut sink = self.lock();
        sink.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            sink.write_all(b"\n")?;
        }
        sink.flush()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("is_tty", &self.is_tty)
            .finish_non_exhaustive()
    }
}

/// Thread-safe byte buffer used to capture output
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Drop captured bytes
    pub fn clear(&self) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puts_appends_single_newline() {
        let (output, buffer) = Output::buffer(false);
        output.puts("first").unwrap();
        output.puts("second\n").unwrap();
        output.puts("").unwrap();
        assert_eq!(buffer.contents(), "first\nsecond\n\n");
    }

    #[test]
    fn test_clones_share_the_sink() {
        let (output, buffer) = Output::buffer(false);
        let other = output.clone();
        output.print("a").unwrap();
        other.print("b").unwrap();
        assert_eq!(buffer.contents(), "ab");
    }

    #[test]
    fn test_tty_override() {
        let (output, _) = Output::buffer(false);
        assert!(!output.is_tty());
        let output = output.with_tty_override(Some(true));
        assert!(output.is_tty());
        let output = output.with_tty_override(None);
        assert!(output.is_tty());
    }

    #[test]
    fn test_write_errors_propagate() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let output = Output::from_writer(Broken, false);
        let err = output.puts("lost").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
