//! Transcript tests: render through a real printer, decode the bytes with the
//! log model, and check both text layout and colors.

use runmux::{Color, ColorProfile, Printer, PrinterConfig, UiSession};
use runmux_harness::{LogModel, ModelColor, SharedBuffer};
use std::io::{self, Write};
use std::sync::Arc;

fn session(config: PrinterConfig, ids: &[&str]) -> (UiSession<Printer>, SharedBuffer) {
    let buf = SharedBuffer::new();
    let ids = ids.iter().map(|s| (*s).to_string()).collect();
    let session = UiSession::start(
        Arc::new(Printer::new(config)),
        Box::new(io::empty()),
        buf.boxed(),
        ids,
    )
    .unwrap();
    (session, buf)
}

fn expected_fg(config: &PrinterConfig, id: &str) -> ModelColor {
    match config.palette.color_for(id).downgrade(config.profile) {
        Some(Color::Ansi16(c)) => ModelColor::Indexed(c.index()),
        Some(Color::Ansi256(n)) => ModelColor::Indexed(n),
        Some(Color::Rgb(rgb)) => ModelColor::Rgb(rgb.r, rgb.g, rgb.b),
        None => panic!("profile {:?} has no colors", config.profile),
    }
}

#[test]
fn build_and_test_transcript() {
    let config = PrinterConfig::plain().with_profile(ColorProfile::Ansi256);
    let (session, buf) = session(config.clone(), &["build", "test"]);

    write!(session.writer("build"), "compiling\n\nlinking\n").unwrap();
    write!(session.writer("test"), "running").unwrap();
    write!(session.writer("build"), "done\n").unwrap();
    session.shutdown().unwrap();

    let model = LogModel::parse(&buf.bytes());
    assert_eq!(
        model.lines(),
        vec![
            "  build│  compiling",
            "          linking",
            "",
            "   test│  running",
            "",
            "  build│  done",
        ]
    );

    let build = expected_fg(&config, "build");
    let test = expected_fg(&config, "test");

    // Label and divider carry the stream color and bold.
    for x in 2..=7 {
        assert_eq!(model.fg_at(0, x), Some(build), "col {x}");
        assert!(model.style_at(0, x).bold);
    }
    assert_eq!(model.fg_at(3, 3), Some(test));
    assert_eq!(model.fg_at(3, 7), Some(test));
    assert_eq!(model.fg_at(5, 2), Some(build));

    // Margins and content stay unstyled.
    assert!(model.style_at(0, 0).is_plain());
    assert!(model.style_at(0, 10).is_plain());
    assert!(model.style_at(1, 10).is_plain());
    assert!(model.style_at(3, 10).is_plain());
}

#[test]
fn mono_output_has_no_escapes() {
    let (session, buf) = session(PrinterConfig::plain(), &["a", "b"]);
    writeln!(session.writer("a"), "one").unwrap();
    writeln!(session.writer("b"), "two").unwrap();
    session.shutdown().unwrap();
    assert!(!buf.contents().contains('\x1b'));
    assert_eq!(buf.contents(), "  a│  one\n\n  b│  two\n");
}

#[test]
fn ansi16_profile_downgrades_labels() {
    let config = PrinterConfig::plain().with_profile(ColorProfile::Ansi16);
    let (session, buf) = session(config.clone(), &["worker"]);
    writeln!(session.writer("worker"), "up").unwrap();
    session.shutdown().unwrap();

    let model = LogModel::parse(&buf.bytes());
    let col = model.find_in_line(0, "worker").unwrap();
    match model.fg_at(0, col) {
        Some(ModelColor::Indexed(n)) => assert!(n < 16, "index {n} is not a 16-color index"),
        other => panic!("unexpected label color {other:?}"),
    }
    assert_eq!(model.fg_at(0, col), Some(expected_fg(&config, "worker")));
}

#[test]
fn same_id_keeps_the_same_color_across_sessions() {
    let config = PrinterConfig::plain().with_profile(ColorProfile::TrueColor);
    let mut colors = Vec::new();
    for _ in 0..2 {
        let (session, buf) = session(config.clone(), &["api", "web"]);
        writeln!(session.writer("api"), "listening").unwrap();
        session.shutdown().unwrap();
        let model = LogModel::parse(&buf.bytes());
        let col = model.find_in_line(0, "api").unwrap();
        colors.push(model.fg_at(0, col));
    }
    assert_eq!(colors[0], colors[1]);
    assert!(colors[0].is_some());
}

#[test]
fn unicode_ids_align_by_cell_width() {
    let (session, buf) = session(PrinterConfig::plain(), &["日本", "ab"]);
    writeln!(session.writer("ab"), "x").unwrap();
    writeln!(session.writer("日本"), "y").unwrap();
    session.shutdown().unwrap();
    assert_eq!(buf.contents(), "    ab│  x\n\n  日本│  y\n");
}
