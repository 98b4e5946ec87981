#![forbid(unsafe_code)]

//! runmux
//!
//! Renders many concurrently running, named output streams into one
//! readable terminal log. Each stream gets a stable color, a right-aligned
//! label, and whole-line output that never interleaves with other streams.
//!
//! # Key Components
//!
//! - [`Ui`] / [`MultiWriter`] - The contract an orchestrator drives
//! - [`Printer`] - Labeled, colored, line-oriented renderer
//! - [`PassthroughUi`] - Forwards raw bytes with no decoration
//! - [`UiSession`] - Runs a UI on its own thread and owns cancellation
//! - [`PrinterConfig`] - Styling and late-write policy
//!
//! # Example
//! ```
//! use runmux::{Printer, PrinterConfig, UiSession};
//! use std::io::{self, Write};
//! use std::sync::Arc;
//!
//! let printer = Arc::new(Printer::new(PrinterConfig::plain()));
//! let ids = vec!["build".to_string(), "test".to_string()];
//! let session =
//!     UiSession::start(printer, Box::new(io::empty()), Box::new(io::sink()), ids).unwrap();
//!
//! writeln!(session.writer("build"), "compiling").unwrap();
//! writeln!(session.writer("test"), "running").unwrap();
//! session.shutdown().unwrap();
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod format;
pub mod passthrough;
pub mod printer;
pub mod session;
pub mod stream;
pub mod ui;

pub use cancel::CancelToken;
pub use config::{LateWritePolicy, PrinterConfig};
pub use error::{PrintError, UiError};
pub use format::{LineLayout, label_width, message_lines};
pub use passthrough::PassthroughUi;
pub use printer::{Phase, Printer};
pub use session::UiSession;
pub use stream::StreamWriter;
pub use ui::{MultiWriter, ReadySignal, ReadyWaiter, Ui};

pub use runmux_style::{Color, ColorProfile, Palette, Style, StyleFlags};
