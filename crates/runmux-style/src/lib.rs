#![forbid(unsafe_code)]

//! Style, color, and color-assignment primitives for runmux.
//!
//! # Example
//! ```
//! use runmux_style::{ColorProfile, Palette, Style};
//!
//! let palette = Palette::default();
//! let label = Style::new().bold().fg(palette.color_for("build"));
//! let rendered = label.render("build", ColorProfile::Ansi256);
//! assert!(rendered.starts_with("\x1b[1;38;5;"));
//! assert_eq!(label.render("build", ColorProfile::Mono), "build");
//! ```

pub mod color;
pub mod palette;
pub mod style;

pub use color::{Ansi16, Color, ColorProfile, Rgb};
pub use palette::{Palette, StableHasher, color_for};
pub use style::{Style, StyleFlags};
