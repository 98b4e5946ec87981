#![forbid(unsafe_code)]

//! Deterministic stream-identifier to color assignment.
//!
//! Assignment hashes the identifier text with a fixed FNV-1a hasher and
//! indexes into a palette, so the same identifier gets the same color in
//! every run, on every platform, with no shared state. Distinct identifiers
//! may collide; that only costs visual distinction, never correctness.

use crate::color::Color;
use std::hash::Hasher;

/// FNV-1a, 64-bit. Unlike `DefaultHasher` its output is fixed forever.
#[derive(Clone, Copy, Debug)]
pub struct StableHasher {
    state: u64,
}

impl StableHasher {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Self::OFFSET,
        }
    }

    /// Hash a string's UTF-8 bytes in one call.
    #[must_use]
    pub fn hash_str(text: &str) -> u64 {
        let mut hasher = Self::new();
        hasher.write(text.as_bytes());
        hasher.finish()
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for StableHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut hash = self.state;
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(Self::PRIME);
        }
        self.state = hash;
    }
}

/// 256-color entries that stay legible on both dark and light backgrounds.
const DEFAULT_COLORS: [u8; 16] = [
    33, 39, 45, 75, 81, 105, 114, 120, 141, 149, 171, 178, 184, 203, 209, 213,
];

/// A non-empty, ordered set of label colors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette; `None` when `colors` is empty.
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color assigned to `id`.
    #[must_use]
    pub fn color_for(&self, id: &str) -> Color {
        let slot = StableHasher::hash_str(id) % self.colors.len() as u64;
        self.colors[slot as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|&i| Color::Ansi256(i)).collect(),
        }
    }
}

/// Color for `id` from the default palette.
#[must_use]
pub fn color_for(id: &str) -> Color {
    Palette::default().color_for(id)
}
