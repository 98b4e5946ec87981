#![forbid(unsafe_code)]

//! Line-oriented model of a scrolling terminal log.
//!
//! Unlike a screen grid, a log only grows: every LF opens a new row and rows
//! are never erased. The model interprets SGR so tests can check which color
//! a label was painted in, and drops every other escape sequence.
//!
//! # Example
//! ```
//! use runmux_harness::log_model::{LogModel, ModelColor};
//!
//! let mut model = LogModel::new();
//! model.feed(b"\x1b[1;38;5;39mbuild\x1b[0m  compiling\n");
//! assert_eq!(model.lines(), vec!["build  compiling".to_string()]);
//! assert_eq!(model.fg_at(0, 0), Some(ModelColor::Indexed(39)));
//! assert!(model.style_at(0, 0).bold);
//! assert_eq!(model.fg_at(0, 7), None);
//! ```

/// Foreground color as it appeared on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelColor {
    /// 0..16 from `30-37` / `90-97`, or any index from `38;5;n`.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

/// Style state tracked by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelStyle {
    pub fg: Option<ModelColor>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

impl ModelStyle {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModelCell {
    ch: char,
    style: ModelStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Ground,
    Escape,
    Csi,
    Osc,
}

/// Growing log of styled rows.
#[derive(Debug, Clone)]
pub struct LogModel {
    rows: Vec<Vec<ModelCell>>,
    cursor_x: usize,
    style: ModelStyle,
    state: ParserState,
    csi_params: Vec<u16>,
    csi_current: u16,
    pending_utf8: Vec<u8>,
}

impl Default for LogModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LogModel {
    pub fn new() -> Self {
        Self {
            rows: vec![Vec::new()],
            cursor_x: 0,
            style: ModelStyle::default(),
            state: ParserState::Ground,
            csi_params: Vec::new(),
            csi_current: 0,
            pending_utf8: Vec::new(),
        }
    }

    /// Parse a complete capture in one go.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut model = Self::new();
        model.feed(bytes);
        model
    }

    /// Feed raw output bytes. UTF-8 sequences may be split across calls.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.pending_utf8.extend_from_slice(bytes);
        let pending = std::mem::take(&mut self.pending_utf8);
        let mut rest: &[u8] = &pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.feed_chars(text);
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    // `valid_up_to` always lands on a char boundary.
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.feed_chars(text);
                    }
                    match err.error_len() {
                        Some(len) => {
                            self.feed_chars("\u{fffd}");
                            rest = &tail[len..];
                        }
                        None => {
                            self.pending_utf8 = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }

    pub fn feed_str(&mut self, text: &str) {
        self.feed(text.as_bytes());
    }

    /// Completed rows plus the current row when it has content.
    pub fn row_count(&self) -> usize {
        match self.rows.last() {
            Some(last) if last.is_empty() => self.rows.len() - 1,
            _ => self.rows.len(),
        }
    }

    /// Row texts, escape sequences removed.
    pub fn lines(&self) -> Vec<String> {
        (0..self.row_count()).map(|y| self.line_text(y)).collect()
    }

    /// Text of one row; empty for rows past the end.
    pub fn line_text(&self, y: usize) -> String {
        self.rows
            .get(y)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    /// Every row joined with `\n`.
    pub fn plain_text(&self) -> String {
        self.lines().join("\n")
    }

    pub fn style_at(&self, y: usize, x: usize) -> ModelStyle {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .map(|c| c.style)
            .unwrap_or_default()
    }

    pub fn fg_at(&self, y: usize, x: usize) -> Option<ModelColor> {
        self.style_at(y, x).fg
    }

    /// Column of the first occurrence of `needle` in row `y`, counted in chars.
    pub fn find_in_line(&self, y: usize, needle: &str) -> Option<usize> {
        let text = self.line_text(y);
        text.find(needle).map(|byte| text[..byte].chars().count())
    }

    fn feed_chars(&mut self, text: &str) {
        for ch in text.chars() {
            self.advance(ch);
        }
    }

    fn advance(&mut self, ch: char) {
        match self.state {
            ParserState::Ground => self.ground(ch),
            ParserState::Escape => self.escape(ch),
            ParserState::Csi => self.csi(ch),
            ParserState::Osc => self.osc(ch),
        }
    }

    fn ground(&mut self, ch: char) {
        match ch {
            '\x1b' => self.state = ParserState::Escape,
            '\n' => {
                self.rows.push(Vec::new());
                self.cursor_x = 0;
            }
            '\r' => self.cursor_x = 0,
            c if c.is_control() && c != '\t' => {}
            c => self.put_char(c),
        }
    }

    fn escape(&mut self, ch: char) {
        match ch {
            '[' => {
                self.state = ParserState::Csi;
                self.csi_params.clear();
                self.csi_current = 0;
            }
            ']' => self.state = ParserState::Osc,
            _ => self.state = ParserState::Ground,
        }
    }

    fn csi(&mut self, ch: char) {
        match ch {
            '0'..='9' => {
                let digit = ch as u16 - u16::from(b'0');
                self.csi_current = self.csi_current.saturating_mul(10).saturating_add(digit);
            }
            ';' => {
                self.csi_params.push(self.csi_current);
                self.csi_current = 0;
            }
            'm' => {
                self.csi_params.push(self.csi_current);
                self.apply_sgr();
                self.state = ParserState::Ground;
            }
            '\u{40}'..='\u{7e}' => self.state = ParserState::Ground,
            _ => {}
        }
    }

    fn osc(&mut self, ch: char) {
        match ch {
            '\x07' => self.state = ParserState::Ground,
            '\x1b' => self.state = ParserState::Escape,
            _ => {}
        }
    }

    fn put_char(&mut self, ch: char) {
        let cell = ModelCell {
            ch,
            style: self.style,
        };
        if let Some(row) = self.rows.last_mut() {
            if self.cursor_x < row.len() {
                row[self.cursor_x] = cell;
            } else {
                row.push(cell);
            }
        }
        self.cursor_x += 1;
    }

    fn apply_sgr(&mut self) {
        let mut params = std::mem::take(&mut self.csi_params);
        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => self.style = ModelStyle::default(),
                1 => self.style.bold = true,
                2 => self.style.dim = true,
                3 => self.style.italic = true,
                4 => self.style.underline = true,
                22 => {
                    self.style.bold = false;
                    self.style.dim = false;
                }
                23 => self.style.italic = false,
                24 => self.style.underline = false,
                n @ 30..=37 => self.style.fg = Some(ModelColor::Indexed((n - 30) as u8)),
                n @ 90..=97 => self.style.fg = Some(ModelColor::Indexed((n - 90 + 8) as u8)),
                38 => match params.get(i + 1) {
                    Some(5) => {
                        if let Some(&index) = params.get(i + 2) {
                            self.style.fg = Some(ModelColor::Indexed(index as u8));
                        }
                        i += 2;
                    }
                    Some(2) => {
                        if let (Some(&r), Some(&g), Some(&b)) =
                            (params.get(i + 2), params.get(i + 3), params.get(i + 4))
                        {
                            self.style.fg = Some(ModelColor::Rgb(r as u8, g as u8, b as u8));
                        }
                        i += 4;
                    }
                    _ => {}
                },
                39 => self.style.fg = None,
                _ => {}
            }
            i += 1;
        }
        params.clear();
        self.csi_params = params;
    }
}
