//! Property-based invariants for color assignment and style rendering.
//!
//! 1. Assignment is a pure function of the identifier text.
//! 2. Assignment always lands inside the palette.
//! 3. Mono rendering is the identity on text.
//! 4. Downgrading is idempotent.

use proptest::prelude::*;
use runmux_style::{Color, ColorProfile, Palette, Style};

fn any_profile() -> impl Strategy<Value = ColorProfile> {
    prop_oneof![
        Just(ColorProfile::Mono),
        Just(ColorProfile::Ansi16),
        Just(ColorProfile::Ansi256),
        Just(ColorProfile::TrueColor),
    ]
}

fn any_color() -> impl Strategy<Value = Color> {
    prop_oneof![
        any::<u8>().prop_map(Color::Ansi256),
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::rgb(r, g, b)),
    ]
}

proptest! {
    #[test]
    fn assignment_is_deterministic(id in ".{0,40}") {
        let a = Palette::default().color_for(&id);
        let b = Palette::default().color_for(&id);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn assignment_stays_in_palette(
        id in "[a-z0-9:_-]{1,24}",
        colors in proptest::collection::vec(any_color(), 1..12),
    ) {
        let palette = Palette::new(colors.clone()).unwrap();
        let assigned = palette.color_for(&id);
        prop_assert!(colors.contains(&assigned));
    }

    #[test]
    fn mono_rendering_is_identity(text in ".{0,64}", color in any_color()) {
        let style = Style::new().bold().underline().fg(color);
        prop_assert_eq!(style.render(&text, ColorProfile::Mono), text);
    }

    #[test]
    fn downgrade_is_idempotent(color in any_color(), profile in any_profile()) {
        let once = color.downgrade(profile);
        let twice = once.and_then(|c| c.downgrade(profile));
        prop_assert_eq!(once, twice);
    }
}
