#![forbid(unsafe_code)]

//! A UI that forwards every stream, unmodified, to one shared sink.

use crate::cancel::CancelToken;
use crate::error::UiError;
use crate::ui::{MultiWriter, ReadySignal, Ui};
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};

type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Pass-through UI: no labels, no line handling, no reordering.
///
/// Each `write` call reaches the sink whole, but lines from different
/// streams interleave at chunk granularity.
pub struct PassthroughUi {
    sink: SharedSink,
}

impl PassthroughUi {
    pub fn new<W: Write + Send + 'static>(sink: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Forward everything to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl std::fmt::Debug for PassthroughUi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassthroughUi").finish_non_exhaustive()
    }
}

struct PassthroughWriter {
    sink: SharedSink,
}

impl Write for PassthroughWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

impl MultiWriter for PassthroughUi {
    fn writer(&self, _id: &str) -> Box<dyn Write + Send> {
        Box::new(PassthroughWriter {
            sink: Arc::clone(&self.sink),
        })
    }
}

impl Ui for PassthroughUi {
    /// The sink given at construction is kept; `stdout` is unused.
    fn start(
        &self,
        cancel: &CancelToken,
        ready: ReadySignal,
        _stdin: Box<dyn Read + Send>,
        _stdout: Box<dyn Write + Send>,
        ids: &[String],
    ) -> Result<(), UiError> {
        tracing::debug!(ids = ids.len(), "passthrough ui started");
        ready.notify();
        cancel.wait();
        tracing::debug!("passthrough ui stopped");
        Ok(())
    }
}
