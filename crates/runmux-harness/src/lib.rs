#![forbid(unsafe_code)]

//! Test support for runmux.
//!
//! - [`SharedBuffer`] - clonable in-memory sink to hand to a printer
//! - [`FailingSink`] - sink whose writes always fail
//! - [`FlakySink`] - sink that fails a set number of writes, then recovers
//! - [`LogModel`] - decodes captured output into styled rows

pub mod capture;
pub mod log_model;

pub use capture::{FailingSink, FlakySink, SharedBuffer};
pub use log_model::{LogModel, ModelColor, ModelStyle};
