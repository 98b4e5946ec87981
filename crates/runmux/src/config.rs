#![forbid(unsafe_code)]

//! Printer configuration.
//!
//! All styling is carried by value in [`PrinterConfig`]; there is no
//! process-wide style state, so two printers in one process can look
//! different.

use runmux_style::{ColorProfile, Palette, Style};

/// What happens to writes that arrive after the session was cancelled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum LateWritePolicy {
    /// Keep rendering until the printer (and its sink) is dropped.
    #[default]
    Allow,
    /// Refuse writes once `start` has returned.
    Reject,
}

/// Configuration for a [`Printer`](crate::Printer).
///
/// # Layout
///
/// A labeled line is
/// `<margin><label right-aligned to the column><divider><margin><content>`;
/// a continuation line replaces label and divider with blanks of the same
/// width.
#[derive(Clone, Debug, PartialEq)]
pub struct PrinterConfig {
    /// Base style for the label and divider. The foreground is replaced by
    /// the palette color of the stream identifier.
    pub label_style: Style,
    /// Style for line content.
    pub value_style: Style,
    /// Colors assigned to stream identifiers.
    pub palette: Palette,
    /// Terminal capability used when emitting styles.
    pub profile: ColorProfile,
    /// Glyph on the trailing edge of the label column.
    pub divider: char,
    /// Spaces on each side of the label column.
    pub margin: usize,
    pub late_writes: LateWritePolicy,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            label_style: Style::new().bold(),
            value_style: Style::new(),
            palette: Palette::default(),
            profile: ColorProfile::detect(),
            divider: '│',
            margin: 2,
            late_writes: LateWritePolicy::Allow,
        }
    }
}

impl PrinterConfig {
    /// Default layout with no escape sequences, for pipes and tests.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            profile: ColorProfile::Mono,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: ColorProfile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn with_label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    #[must_use]
    pub fn with_value_style(mut self, style: Style) -> Self {
        self.value_style = style;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_divider(mut self, divider: char) -> Self {
        self.divider = divider;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_late_writes(mut self, policy: LateWritePolicy) -> Self {
        self.late_writes = policy;
        self
    }
}
