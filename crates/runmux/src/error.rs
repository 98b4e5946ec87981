#![forbid(unsafe_code)]

//! Error types for the printer and UI lifecycle.

use std::io;

/// Why a single `Printer::write` call produced no output.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// `write` ran before `start` bound an output sink.
    #[error("printer is not started: no output sink is bound yet")]
    NotReady,

    /// The session ended and late writes are rejected.
    #[error("printer is stopped: writes after cancellation are rejected")]
    Closed,

    /// The output sink failed.
    #[error("output sink failed: {0}")]
    Io(#[from] io::Error),
}

/// Errors from starting, running, or shutting down a UI.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// `start` was called while a previous `start` is still blocked.
    #[error("UI is already running")]
    AlreadyRunning,

    /// The UI returned (or its ready signal was dropped) without signalling readiness.
    #[error("UI exited without signalling readiness")]
    NotReady,

    /// The thread driving the UI panicked.
    #[error("UI thread panicked")]
    Panicked,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
