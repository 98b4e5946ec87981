#![forbid(unsafe_code)]

//! The multiplexing printer.
//!
//! Many writers, one sink. Every [`Printer::write`] call formats and emits
//! all of its lines while holding a single lock, so output from concurrent
//! streams never interleaves below the granularity of one call.
//!
//! # Rendering
//!
//! The first line of a run from one identifier carries a colored,
//! right-aligned label; following lines from the same identifier are
//! continuation lines with a blank label. When the identifier changes, a
//! blank separator line precedes the new label.
//!
//! ```text
//!   build│  compiling
//!           linking
//!
//!    test│  running
//!
//!   build│  done
//! ```

use crate::cancel::CancelToken;
use crate::config::{LateWritePolicy, PrinterConfig};
use crate::error::{PrintError, UiError};
use crate::format::{LineLayout, label_width, message_lines};
use crate::stream::StreamWriter;
use crate::ui::{MultiWriter, ReadySignal, Ui};
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

/// Name the printer lock is traced under.
const LOCK_NAME: &str = "printer";

/// Lifecycle of a printer session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Constructed, never started. Writes fail with `NotReady`.
    Idle,
    /// `start` is blocked waiting for cancellation.
    Running,
    /// `start` returned. Writes follow the configured [`LateWritePolicy`].
    Stopped,
}

struct PrinterState {
    sink: Option<Box<dyn Write + Send>>,
    label_width: usize,
    last_id: Option<String>,
    phase: Phase,
}

struct PrinterInner {
    config: PrinterConfig,
    state: Mutex<PrinterState>,
}

/// Shared renderer for many named output streams.
///
/// Cloning is cheap; all clones render into the same session.
#[derive(Clone)]
pub struct Printer {
    inner: Arc<PrinterInner>,
}

impl std::fmt::Debug for Printer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Printer");
        match self.inner.state.try_lock() {
            Ok(state) => debug_state(&mut out, &state),
            Err(TryLockError::Poisoned(poisoned)) => debug_state(&mut out, &poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => {
                out.field("state", &format_args!("<locked>"));
            }
        }
        out.finish_non_exhaustive()
    }
}

fn debug_state(out: &mut std::fmt::DebugStruct<'_, '_>, state: &PrinterState) {
    out.field("phase", &state.phase)
        .field("label_width", &state.label_width)
        .field("last_id", &state.last_id);
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrinterConfig::default())
    }
}

impl Printer {
    pub fn new(config: PrinterConfig) -> Self {
        Self {
            inner: Arc::new(PrinterInner {
                config,
                state: Mutex::new(PrinterState {
                    sink: None,
                    label_width: 0,
                    last_id: None,
                    phase: Phase::Idle,
                }),
            }),
        }
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.inner.config
    }

    /// Width of the label column for the current session.
    pub fn label_width(&self) -> usize {
        self.lock("label_width").label_width
    }

    /// Identifier of the most recently rendered labeled run.
    pub fn last_id(&self) -> Option<String> {
        self.lock("last_id").last_id.clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock("phase").phase
    }

    /// Render `message` as lines from stream `id`.
    ///
    /// Returns how many lines were rendered. Whitespace-only lines render
    /// nothing and leave the label state untouched. The empty id is an
    /// ordinary stream with a blank label. If the sink fails, the next write
    /// labels its first line again.
    pub fn write(&self, id: &str, message: &str) -> Result<usize, PrintError> {
        let mut guard = self.lock("write");
        let state = &mut *guard;

        let Some(sink) = state.sink.as_mut() else {
            return Err(match state.phase {
                Phase::Stopped => PrintError::Closed,
                Phase::Idle | Phase::Running => PrintError::NotReady,
            });
        };

        let layout = LineLayout::new(&self.inner.config, state.label_width);
        let mut out = String::new();
        let mut rendered = 0;
        let mut current = state.last_id.as_deref();
        let mut switched = false;
        for line in message_lines(message) {
            if current == Some(id) {
                layout.push_continuation(&mut out, line);
            } else {
                if current.is_some() {
                    layout.push_separator(&mut out);
                }
                layout.push_labeled(&mut out, id, line);
                current = Some(id);
                switched = true;
            }
            rendered += 1;
        }

        if rendered > 0 {
            sink.write_all(out.as_bytes())?;
            sink.flush()?;
        }
        // Only output that reached the sink may open a run.
        if switched {
            state.last_id = Some(id.to_owned());
        }
        Ok(rendered)
    }

    /// [`write`](Self::write) for raw bytes; invalid UTF-8 is replaced.
    pub fn write_bytes(&self, id: &str, bytes: &[u8]) -> Result<usize, PrintError> {
        self.write(id, &String::from_utf8_lossy(bytes))
    }

    /// Bind the sink and size the label column for `ids`.
    pub(crate) fn bind(&self, sink: Box<dyn Write + Send>, ids: &[String]) -> Result<(), UiError> {
        let mut state = self.lock("bind");
        if state.phase == Phase::Running {
            return Err(UiError::AlreadyRunning);
        }
        state.sink = Some(sink);
        state.label_width = label_width(ids);
        state.last_id = None;
        state.phase = Phase::Running;
        tracing::debug!(
            ids = ids.len(),
            label_width = state.label_width,
            "printer started"
        );
        Ok(())
    }

    /// End the session, applying the late-write policy.
    pub(crate) fn unbind(&self) {
        let mut state = self.lock("unbind");
        state.phase = Phase::Stopped;
        if self.inner.config.late_writes == LateWritePolicy::Reject {
            state.sink = None;
        }
        tracing::debug!(policy = ?self.inner.config.late_writes, "printer stopped");
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, PrinterState> {
        let guard = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::trace!(lock = LOCK_NAME, op, "lock acquired");
        guard
    }
}

impl MultiWriter for Printer {
    fn writer(&self, id: &str) -> Box<dyn Write + Send> {
        Box::new(StreamWriter::new(self.clone(), id))
    }
}

impl Ui for Printer {
    fn start(
        &self,
        cancel: &CancelToken,
        ready: ReadySignal,
        _stdin: Box<dyn Read + Send>,
        stdout: Box<dyn Write + Send>,
        ids: &[String],
    ) -> Result<(), UiError> {
        self.bind(stdout, ids)?;
        ready.notify();
        cancel.wait();
        self.unbind();
        Ok(())
    }
}
