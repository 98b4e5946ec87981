#![forbid(unsafe_code)]

//! Orchestrator-side driver for a [`Ui`].
//!
//! Runs `start` on its own thread, blocks until the UI reports ready, and
//! owns the cancellation token that ends the session.

use crate::cancel::CancelToken;
use crate::error::UiError;
use crate::ui::{ReadySignal, Ui};
use std::io::{Read, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A running UI session.
///
/// Dropping the session cancels it and waits for the UI thread.
pub struct UiSession<U: Ui + 'static> {
    ui: Arc<U>,
    cancel: CancelToken,
    handle: Option<JoinHandle<Result<(), UiError>>>,
}

impl<U: Ui + 'static> UiSession<U> {
    /// Start `ui` for `ids` and wait until it is ready for writes.
    ///
    /// If the UI exits before signalling readiness, its own error is
    /// returned (or `NotReady` when it returned `Ok` without signalling).
    pub fn start(
        ui: Arc<U>,
        stdin: Box<dyn Read + Send>,
        stdout: Box<dyn Write + Send>,
        ids: Vec<String>,
    ) -> Result<Self, UiError> {
        let cancel = CancelToken::new();
        let (ready, waiter) = ReadySignal::channel();

        let handle = thread::Builder::new().name("runmux-ui".into()).spawn({
            let ui = Arc::clone(&ui);
            let cancel = cancel.clone();
            move || ui.start(&cancel, ready, stdin, stdout, &ids)
        })?;

        if waiter.wait().is_err() {
            return Err(match handle.join() {
                Ok(Err(err)) => err,
                Ok(Ok(())) => UiError::NotReady,
                Err(_) => UiError::Panicked,
            });
        }

        tracing::debug!("ui session ready");
        Ok(Self {
            ui,
            cancel,
            handle: Some(handle),
        })
    }

    pub fn ui(&self) -> &Arc<U> {
        &self.ui
    }

    /// Writer for stream `id`.
    pub fn writer(&self, id: &str) -> Box<dyn Write + Send> {
        self.ui.writer(id)
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Signal cancellation without waiting for the UI thread.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait for `start` to return.
    pub fn shutdown(mut self) -> Result<(), UiError> {
        self.cancel.cancel();
        self.join()
    }

    fn join(&mut self) -> Result<(), UiError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| UiError::Panicked)?,
            None => Ok(()),
        }
    }
}

impl<U: Ui + 'static> Drop for UiSession<U> {
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }
        self.cancel.cancel();
        if let Err(err) = self.join() {
            tracing::warn!(error = %err, "ui session ended with error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrinterConfig;
    use crate::printer::{Phase, Printer};
    use crate::ui::MultiWriter;
    use runmux_harness::SharedBuffer;
    use std::io;

    struct NeverReady;

    impl MultiWriter for NeverReady {
        fn writer(&self, _id: &str) -> Box<dyn Write + Send> {
            Box::new(io::sink())
        }
    }

    impl Ui for NeverReady {
        fn start(
            &self,
            _cancel: &CancelToken,
            _ready: ReadySignal,
            _stdin: Box<dyn Read + Send>,
            _stdout: Box<dyn Write + Send>,
            _ids: &[String],
        ) -> Result<(), UiError> {
            Ok(())
        }
    }

    struct Panics;

    impl MultiWriter for Panics {
        fn writer(&self, _id: &str) -> Box<dyn Write + Send> {
            Box::new(io::sink())
        }
    }

    impl Ui for Panics {
        fn start(
            &self,
            _cancel: &CancelToken,
            _ready: ReadySignal,
            _stdin: Box<dyn Read + Send>,
            _stdout: Box<dyn Write + Send>,
            _ids: &[String],
        ) -> Result<(), UiError> {
            panic!("ui failed to initialize");
        }
    }

    fn start_printer(printer: Printer, buf: &SharedBuffer) -> UiSession<Printer> {
        UiSession::start(
            Arc::new(printer),
            Box::new(io::empty()),
            buf.boxed(),
            vec!["a".into(), "bb".into()],
        )
        .unwrap()
    }

    #[test]
    fn printer_is_running_once_start_returns() {
        let buf = SharedBuffer::new();
        let session = start_printer(Printer::new(PrinterConfig::plain()), &buf);
        assert_eq!(session.ui().phase(), Phase::Running);
        assert_eq!(session.ui().label_width(), 2);

        session.writer("a").write_all(b"hi").unwrap();
        let printer = Arc::clone(session.ui());
        session.shutdown().unwrap();
        assert_eq!(printer.phase(), Phase::Stopped);
        assert_eq!(buf.contents(), "   a│  hi\n");
    }

    #[test]
    fn ui_that_never_signals_is_not_ready() {
        let result = UiSession::start(
            Arc::new(NeverReady),
            Box::new(io::empty()),
            Box::new(io::sink()),
            Vec::new(),
        );
        assert!(matches!(result, Err(UiError::NotReady)));
    }

    #[test]
    fn panicking_ui_is_reported() {
        let result = UiSession::start(
            Arc::new(Panics),
            Box::new(io::empty()),
            Box::new(io::sink()),
            Vec::new(),
        );
        assert!(matches!(result, Err(UiError::Panicked)));
    }

    #[test]
    fn start_error_is_surfaced() {
        let buf = SharedBuffer::new();
        let printer = Printer::new(PrinterConfig::plain());
        let first = start_printer(printer.clone(), &buf);
        let second = UiSession::start(
            Arc::new(printer),
            Box::new(io::empty()),
            buf.boxed(),
            Vec::new(),
        );
        assert!(matches!(second, Err(UiError::AlreadyRunning)));
        first.shutdown().unwrap();
    }

    #[test]
    fn drop_cancels_and_joins() {
        let buf = SharedBuffer::new();
        let session = start_printer(Printer::new(PrinterConfig::plain()), &buf);
        let token = session.cancel_token();
        let printer = Arc::clone(session.ui());
        drop(session);
        assert!(token.is_cancelled());
        assert_eq!(printer.phase(), Phase::Stopped);
    }
}
