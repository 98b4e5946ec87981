#![forbid(unsafe_code)]

//! Line splitting and label-column layout.

use crate::config::PrinterConfig;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Renderable lines of one message: trimmed, split on `\n`, each line
/// trimmed again, blank lines dropped.
pub fn message_lines(message: &str) -> impl Iterator<Item = &str> {
    message
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Label column width for a set of identifiers, in terminal cells.
///
/// For ASCII identifiers this is the byte length of the longest one.
pub fn label_width<S: AsRef<str>>(ids: &[S]) -> usize {
    ids.iter()
        .map(|id| UnicodeWidthStr::width(id.as_ref()))
        .max()
        .unwrap_or(0)
}

/// Formats lines against a fixed label column.
#[derive(Clone, Copy, Debug)]
pub struct LineLayout<'a> {
    config: &'a PrinterConfig,
    width: usize,
}

impl<'a> LineLayout<'a> {
    pub fn new(config: &'a PrinterConfig, width: usize) -> Self {
        Self { config, width }
    }

    /// Blank line between runs of different identifiers.
    pub fn push_separator(&self, out: &mut String) {
        out.push('\n');
    }

    /// Line that opens a run: colored, right-aligned identifier plus divider.
    pub fn push_labeled(&self, out: &mut String, id: &str, content: &str) {
        let config = self.config;
        push_spaces(out, config.margin);
        push_spaces(out, self.width.saturating_sub(UnicodeWidthStr::width(id)));

        let mut label = String::with_capacity(id.len() + config.divider.len_utf8());
        label.push_str(id);
        label.push(config.divider);
        let style = config.label_style.fg(config.palette.color_for(id));
        style.render_into(out, &label, config.profile);

        push_spaces(out, config.margin);
        config.value_style.render_into(out, content, config.profile);
        out.push('\n');
    }

    /// Line that continues the current run: blank label, no divider.
    pub fn push_continuation(&self, out: &mut String, content: &str) {
        let config = self.config;
        let divider_width = UnicodeWidthChar::width(config.divider).unwrap_or(1);
        push_spaces(out, config.margin + self.width + divider_width + config.margin);
        config.value_style.render_into(out, content, config.profile);
        out.push('\n');
    }
}

fn push_spaces(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n(' ', count));
}
