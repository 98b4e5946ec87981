#![forbid(unsafe_code)]

//! Terminal colors and color-capability profiles.
//!
//! Colors are stored at the precision they were declared with and only
//! lowered to what the terminal supports at render time via
//! [`Color::downgrade`]. Downgrading never upgrades: an [`Ansi16`] color stays
//! an `Ansi16` color on a truecolor terminal.

use std::fmt::Write as _;

/// 24-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared euclidean distance, used for nearest-palette matching.
    #[inline]
    fn distance_sq(self, other: Self) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// The sixteen standard terminal colors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Ansi16 {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Ansi16 {
    pub const ALL: [Ansi16; 16] = [
        Ansi16::Black,
        Ansi16::Red,
        Ansi16::Green,
        Ansi16::Yellow,
        Ansi16::Blue,
        Ansi16::Magenta,
        Ansi16::Cyan,
        Ansi16::White,
        Ansi16::BrightBlack,
        Ansi16::BrightRed,
        Ansi16::BrightGreen,
        Ansi16::BrightYellow,
        Ansi16::BrightBlue,
        Ansi16::BrightMagenta,
        Ansi16::BrightCyan,
        Ansi16::BrightWhite,
    ];

    /// Index in the standard 0..16 ordering.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Color for an index in 0..16.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 16 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Reference RGB values (xterm defaults).
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        match self {
            Ansi16::Black => Rgb::new(0, 0, 0),
            Ansi16::Red => Rgb::new(205, 0, 0),
            Ansi16::Green => Rgb::new(0, 205, 0),
            Ansi16::Yellow => Rgb::new(205, 205, 0),
            Ansi16::Blue => Rgb::new(0, 0, 238),
            Ansi16::Magenta => Rgb::new(205, 0, 205),
            Ansi16::Cyan => Rgb::new(0, 205, 205),
            Ansi16::White => Rgb::new(229, 229, 229),
            Ansi16::BrightBlack => Rgb::new(127, 127, 127),
            Ansi16::BrightRed => Rgb::new(255, 0, 0),
            Ansi16::BrightGreen => Rgb::new(0, 255, 0),
            Ansi16::BrightYellow => Rgb::new(255, 255, 0),
            Ansi16::BrightBlue => Rgb::new(92, 92, 255),
            Ansi16::BrightMagenta => Rgb::new(255, 0, 255),
            Ansi16::BrightCyan => Rgb::new(0, 255, 255),
            Ansi16::BrightWhite => Rgb::new(255, 255, 255),
        }
    }

    fn nearest(rgb: Rgb) -> Self {
        let mut best = Ansi16::Black;
        let mut best_dist = u32::MAX;
        for candidate in Self::ALL {
            let dist = candidate.to_rgb().distance_sq(rgb);
            if dist < best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
        best
    }
}

/// What the output terminal can display.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ColorProfile {
    /// No escape sequences at all (pipes, `NO_COLOR`, dumb terminals).
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

impl ColorProfile {
    /// Detect the profile from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_from(|key| std::env::var(key).ok())
    }

    /// Detect the profile from an arbitrary variable lookup.
    ///
    /// `NO_COLOR` (any value) and `TERM=dumb` force [`ColorProfile::Mono`];
    /// `COLORTERM=truecolor|24bit` selects truecolor; a `TERM` mentioning
    /// `256color` selects 256 colors; everything else gets the basic sixteen.
    #[must_use]
    pub fn detect_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("NO_COLOR").is_some() {
            return ColorProfile::Mono;
        }
        let term = lookup("TERM").unwrap_or_default();
        if term == "dumb" {
            return ColorProfile::Mono;
        }
        let colorterm = lookup("COLORTERM").unwrap_or_default().to_ascii_lowercase();
        let profile = if colorterm == "truecolor" || colorterm == "24bit" {
            ColorProfile::TrueColor
        } else if term.contains("256color") {
            ColorProfile::Ansi256
        } else {
            ColorProfile::Ansi16
        };
        tracing::debug!(?profile, term = %term, colorterm = %colorterm, "detected color profile");
        profile
    }

    /// Whether this profile emits any escape sequences.
    #[must_use]
    pub const fn supports_color(self) -> bool {
        !matches!(self, ColorProfile::Mono)
    }
}

/// A terminal foreground/background color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Ansi16(Ansi16),
    Ansi256(u8),
    Rgb(Rgb),
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(Rgb::new(r, g, b))
    }

    /// Approximate RGB value of this color.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        match self {
            Color::Ansi16(c) => c.to_rgb(),
            Color::Ansi256(index) => ansi256_to_rgb(index),
            Color::Rgb(rgb) => rgb,
        }
    }

    /// Lower this color to something `profile` can display.
    ///
    /// Returns `None` for [`ColorProfile::Mono`].
    #[must_use]
    pub fn downgrade(self, profile: ColorProfile) -> Option<Color> {
        match profile {
            ColorProfile::Mono => None,
            ColorProfile::TrueColor => Some(self),
            ColorProfile::Ansi256 => Some(match self {
                Color::Rgb(rgb) => Color::Ansi256(rgb_to_ansi256(rgb)),
                other => other,
            }),
            ColorProfile::Ansi16 => Some(match self {
                Color::Ansi16(c) => Color::Ansi16(c),
                Color::Ansi256(index) => match Ansi16::from_index(index) {
                    Some(c) => Color::Ansi16(c),
                    None => Color::Ansi16(Ansi16::nearest(ansi256_to_rgb(index))),
                },
                Color::Rgb(rgb) => Color::Ansi16(Ansi16::nearest(rgb)),
            }),
        }
    }

    /// Append the SGR foreground parameters (without `ESC[` / `m`).
    pub fn push_fg_params(self, out: &mut String) {
        match self {
            Color::Ansi16(c) => {
                let index = c.index();
                let code = if index < 8 { 30 + index } else { 90 + index - 8 };
                let _ = write!(out, "{code}");
            }
            Color::Ansi256(index) => {
                let _ = write!(out, "38;5;{index}");
            }
            Color::Rgb(Rgb { r, g, b }) => {
                let _ = write!(out, "38;2;{r};{g};{b}");
            }
        }
    }
}

impl From<Ansi16> for Color {
    fn from(value: Ansi16) -> Self {
        Color::Ansi16(value)
    }
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Color::Rgb(value)
    }
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn ansi256_to_rgb(index: u8) -> Rgb {
    match index {
        0..=15 => Ansi16::ALL[index as usize].to_rgb(),
        16..=231 => {
            let i = index - 16;
            Rgb::new(
                CUBE_LEVELS[(i / 36) as usize],
                CUBE_LEVELS[((i / 6) % 6) as usize],
                CUBE_LEVELS[(i % 6) as usize],
            )
        }
        232..=255 => {
            let level = 8 + (index - 232) * 10;
            Rgb::new(level, level, level)
        }
    }
}

fn nearest_cube_level(value: u8) -> u8 {
    let mut best = 0u8;
    let mut best_dist = u8::MAX;
    for (i, level) in CUBE_LEVELS.iter().enumerate() {
        let dist = value.abs_diff(*level);
        if dist < best_dist {
            best = i as u8;
            best_dist = dist;
        }
    }
    best
}

fn rgb_to_ansi256(rgb: Rgb) -> u8 {
    let (ri, gi, bi) = (
        nearest_cube_level(rgb.r),
        nearest_cube_level(rgb.g),
        nearest_cube_level(rgb.b),
    );
    let cube_index = 16 + 36 * ri + 6 * gi + bi;
    let cube_rgb = ansi256_to_rgb(cube_index);

    let avg = ((u16::from(rgb.r) + u16::from(rgb.g) + u16::from(rgb.b)) / 3) as u8;
    let gray_step = if avg < 8 { 0 } else { ((avg - 8) / 10).min(23) };
    let gray_index = 232 + gray_step;
    let gray_rgb = ansi256_to_rgb(gray_index);

    if gray_rgb.distance_sq(rgb) < cube_rgb.distance_sq(rgb) {
        gray_index
    } else {
        cube_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn no_color_wins_over_everything() {
        let lookup = env(&[("NO_COLOR", ""), ("COLORTERM", "truecolor")]);
        assert_eq!(ColorProfile::detect_from(lookup), ColorProfile::Mono);
    }

    #[test]
    fn dumb_terminal_is_mono() {
        assert_eq!(
            ColorProfile::detect_from(env(&[("TERM", "dumb")])),
            ColorProfile::Mono
        );
    }

    #[test]
    fn colorterm_selects_truecolor() {
        let lookup = env(&[("TERM", "xterm"), ("COLORTERM", "24bit")]);
        assert_eq!(ColorProfile::detect_from(lookup), ColorProfile::TrueColor);
    }

    #[test]
    fn term_256color() {
        let lookup = env(&[("TERM", "screen-256color")]);
        assert_eq!(ColorProfile::detect_from(lookup), ColorProfile::Ansi256);
    }

    #[test]
    #[tracing_test::traced_test]
    fn fallback_is_ansi16() {
        assert_eq!(ColorProfile::detect_from(env(&[])), ColorProfile::Ansi16);
        assert!(logs_contain("detected color profile"));
    }

    #[test]
    fn mono_drops_color() {
        assert_eq!(Color::Ansi256(200).downgrade(ColorProfile::Mono), None);
    }

    #[test]
    fn downgrade_never_upgrades() {
        let c = Color::Ansi16(Ansi16::Red);
        assert_eq!(c.downgrade(ColorProfile::TrueColor), Some(c));
        assert_eq!(c.downgrade(ColorProfile::Ansi256), Some(c));
    }

    #[test]
    fn low_ansi256_maps_to_named_color() {
        assert_eq!(
            Color::Ansi256(9).downgrade(ColorProfile::Ansi16),
            Some(Color::Ansi16(Ansi16::BrightRed))
        );
    }

    #[test]
    fn rgb_to_256_hits_cube_corners() {
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 0)), 16);
    }

    #[test]
    fn rgb_to_256_prefers_gray_ramp_for_grays() {
        let index = rgb_to_ansi256(Rgb::new(128, 128, 128));
        assert!((232..=255).contains(&index), "got {index}");
    }

    #[test]
    fn sgr_params() {
        let mut out = String::new();
        Color::Ansi16(Ansi16::Green).push_fg_params(&mut out);
        assert_eq!(out, "32");

        out.clear();
        Color::Ansi16(Ansi16::BrightCyan).push_fg_params(&mut out);
        assert_eq!(out, "96");

        out.clear();
        Color::Ansi256(141).push_fg_params(&mut out);
        assert_eq!(out, "38;5;141");

        out.clear();
        Color::rgb(1, 2, 3).push_fg_params(&mut out);
        assert_eq!(out, "38;2;1;2;3");
    }

    #[test]
    fn ansi256_round_trip_through_rgb_for_cube_entries() {
        for index in 16u8..=231 {
            assert_eq!(rgb_to_ansi256(ansi256_to_rgb(index)), index);
        }
    }
}
