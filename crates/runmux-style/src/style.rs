#![forbid(unsafe_code)]

//! Text styles rendered as SGR escape sequences.

use crate::color::{Color, ColorProfile};
use bitflags::bitflags;

bitflags! {
    /// Text attributes independent of color.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
    }
}

/// Foreground color plus attributes.
///
/// The default style is neutral: rendering it produces the text verbatim.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Style {
    pub fg: Option<Color>,
    pub flags: StyleFlags,
}

impl Style {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            flags: StyleFlags::empty(),
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::BOLD);
        self
    }

    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::DIM);
        self
    }

    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::ITALIC);
        self
    }

    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::UNDERLINE);
        self
    }

    /// True when the style carries no color and no attributes.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.flags.is_empty()
    }

    /// SGR parameter list for `profile`, or `None` when nothing would be emitted.
    fn sgr_params(&self, profile: ColorProfile) -> Option<String> {
        if !profile.supports_color() {
            return None;
        }
        fn push(params: &mut String, code: &str) {
            if !params.is_empty() {
                params.push(';');
            }
            params.push_str(code);
        }

        let mut params = String::new();
        if self.flags.contains(StyleFlags::BOLD) {
            push(&mut params, "1");
        }
        if self.flags.contains(StyleFlags::DIM) {
            push(&mut params, "2");
        }
        if self.flags.contains(StyleFlags::ITALIC) {
            push(&mut params, "3");
        }
        if self.flags.contains(StyleFlags::UNDERLINE) {
            push(&mut params, "4");
        }
        if let Some(color) = self.fg.and_then(|c| c.downgrade(profile)) {
            if !params.is_empty() {
                params.push(';');
            }
            color.push_fg_params(&mut params);
        }
        if params.is_empty() { None } else { Some(params) }
    }

    /// Append `text` wrapped in this style's escape sequences.
    ///
    /// Nothing but `text` is written when the style is empty for `profile`.
    pub fn render_into(&self, out: &mut String, text: &str, profile: ColorProfile) {
        match self.sgr_params(profile) {
            Some(params) => {
                out.push_str("\x1b[");
                out.push_str(&params);
                out.push('m');
                out.push_str(text);
                out.push_str("\x1b[0m");
            }
            None => out.push_str(text),
        }
    }

    #[must_use]
    pub fn render(&self, text: &str, profile: ColorProfile) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        self.render_into(&mut out, text, profile);
        out
    }
}
