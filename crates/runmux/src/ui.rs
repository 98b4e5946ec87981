#![forbid(unsafe_code)]

//! The contract between an orchestrator and whatever renders its output.
//!
//! An orchestrator knows every stream identifier up front. It hands the
//! full set to [`Ui::start`] on a dedicated thread, waits for the ready
//! signal, then gives each unit of work a writer from
//! [`MultiWriter::writer`]. Cancelling the token ends the session.
//!
//! ```
//! use runmux::{CancelToken, MultiWriter, PassthroughUi, ReadySignal, Ui};
//! use std::io::{self, Write};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let ui = Arc::new(PassthroughUi::new(io::sink()));
//! let cancel = CancelToken::new();
//! let (ready, waiter) = ReadySignal::channel();
//!
//! let runner = {
//!     let (ui, cancel) = (Arc::clone(&ui), cancel.clone());
//!     thread::spawn(move || {
//!         ui.start(&cancel, ready, Box::new(io::empty()), Box::new(io::sink()), &["a".into()])
//!     })
//! };
//! waiter.wait().unwrap();
//! writeln!(ui.writer("a"), "hello").unwrap();
//! cancel.cancel();
//! runner.join().unwrap().unwrap();
//! ```

use crate::cancel::CancelToken;
use crate::error::UiError;
use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::time::Duration;

/// Source of per-stream write endpoints.
pub trait MultiWriter: Send + Sync {
    /// Write endpoint bound to `id`. Performs no I/O itself and may be
    /// called any number of times, before or after `start`.
    fn writer(&self, id: &str) -> Box<dyn Write + Send>;
}

/// A rendering strategy an orchestrator can drive.
pub trait Ui: MultiWriter {
    /// Initialize for the full identifier set, notify `ready` exactly once,
    /// then block until `cancel` fires.
    fn start(
        &self,
        cancel: &CancelToken,
        ready: ReadySignal,
        stdin: Box<dyn Read + Send>,
        stdout: Box<dyn Write + Send>,
        ids: &[String],
    ) -> Result<(), UiError>;
}

/// One-shot readiness notification.
///
/// `notify` consumes the signal, so a UI cannot report ready twice.
#[derive(Debug)]
pub struct ReadySignal {
    tx: SyncSender<()>,
}

impl ReadySignal {
    /// Create a connected signal/waiter pair.
    pub fn channel() -> (ReadySignal, ReadyWaiter) {
        let (tx, rx) = mpsc::sync_channel(1);
        (ReadySignal { tx }, ReadyWaiter { rx })
    }

    pub fn notify(self) {
        // The buffer holds the single message, so this never blocks. A
        // disconnected waiter just means nobody is listening anymore.
        if self.tx.try_send(()).is_err() {
            tracing::debug!("ready signal had no listener");
        }
    }
}

/// Receiving half of a [`ReadySignal`].
#[derive(Debug)]
pub struct ReadyWaiter {
    rx: Receiver<()>,
}

impl ReadyWaiter {
    /// Block until ready; `NotReady` if the signal was dropped unsent.
    pub fn wait(&self) -> Result<(), UiError> {
        self.rx.recv().map_err(|_| UiError::NotReady)
    }

    /// Like [`wait`](Self::wait) with a deadline. `Ok(false)` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<bool, UiError> {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => Ok(true),
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Err(UiError::NotReady),
        }
    }
}
