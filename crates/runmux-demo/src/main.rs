#![forbid(unsafe_code)]

//! runmux demo: a fake task runner whose tasks print through one UI.
//!
//! Each `--task` runs on its own thread and emits progress lines, some of
//! them multi-line, at a fixed pace. Ctrl-C cancels the session.
//!
//! # Environment Variables
//!
//! - `RUNMUX_LOG`: tracing filter for diagnostics on stderr (default `warn`)

use clap::{Parser, ValueEnum};
use runmux::{
    CancelToken, ColorProfile, LateWritePolicy, PassthroughUi, Printer, PrinterConfig, Ui,
    UiError, UiSession,
};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "runmux-demo")]
#[command(version, about = "Run fake tasks and multiplex their output", long_about = None)]
struct Args {
    /// Task name; repeat for more tasks
    #[arg(short, long = "task", value_name = "NAME", default_values_t = default_tasks())]
    tasks: Vec<String>,

    /// Progress lines each task prints
    #[arg(short, long, default_value_t = 5)]
    lines: usize,

    /// Pause between progress lines
    #[arg(long, value_name = "MS", default_value_t = 150)]
    delay_ms: u64,

    /// When to emit color escapes
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// How task output is rendered
    #[arg(long, value_enum, default_value_t = UiKind::Printer)]
    ui: UiKind,

    /// Drop output that arrives after cancellation
    #[arg(long)]
    reject_late: bool,
}

fn default_tasks() -> Vec<String> {
    ["build", "test", "lint"].map(String::from).to_vec()
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn profile(self) -> ColorProfile {
        match self {
            Self::Auto => ColorProfile::detect(),
            Self::Always => match ColorProfile::detect() {
                ColorProfile::TrueColor => ColorProfile::TrueColor,
                _ => ColorProfile::Ansi256,
            },
            Self::Never => ColorProfile::Mono,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UiKind {
    /// Labeled, colored, line-oriented output
    Printer,
    /// Raw bytes, no decoration
    Passthrough,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUNMUX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let result = match args.ui {
        UiKind::Printer => {
            let late = if args.reject_late {
                LateWritePolicy::Reject
            } else {
                LateWritePolicy::Allow
            };
            let config = PrinterConfig::default()
                .with_profile(args.color.profile())
                .with_late_writes(late);
            run(Arc::new(Printer::new(config)), &args)
        }
        UiKind::Passthrough => run(Arc::new(PassthroughUi::stdout()), &args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "demo failed");
            eprintln!("runmux-demo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run<U: Ui + 'static>(ui: Arc<U>, args: &Args) -> Result<(), UiError> {
    let session = UiSession::start(
        ui,
        Box::new(io::stdin()),
        Box::new(io::stdout()),
        args.tasks.clone(),
    )?;
    let cancel = session.cancel_token();

    #[cfg(unix)]
    let signals = watch_signals(cancel.clone())?;

    let delay = Duration::from_millis(args.delay_ms);
    let workers = args
        .tasks
        .iter()
        .enumerate()
        .map(|(n, name)| {
            let writer = session.writer(name);
            let cancel = cancel.clone();
            let name = name.clone();
            let lines = args.lines;
            // Stagger tasks so their output overlaps instead of lining up.
            let delay = delay + Duration::from_millis(n as u64 * 37);
            thread::Builder::new()
                .name(format!("task-{name}"))
                .spawn(move || simulate_task(&name, writer, lines, delay, &cancel))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for worker in workers {
        match worker.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "task output failed"),
            Err(_) => tracing::warn!("task thread panicked"),
        }
    }

    #[cfg(unix)]
    signals.close();

    session.shutdown()
}

fn simulate_task(
    name: &str,
    mut out: Box<dyn Write + Send>,
    lines: usize,
    delay: Duration,
    cancel: &CancelToken,
) -> io::Result<()> {
    tracing::debug!(task = name, lines, "task started");
    for step in 1..=lines {
        if cancel.wait_timeout(delay) {
            writeln!(out, "cancelled at step {step}")?;
            return Ok(());
        }
        if step % 3 == 0 {
            writeln!(out, "step {step}/{lines}: checkpoint\n  {name}: {step} units done")?;
        } else {
            writeln!(out, "step {step}/{lines}: working")?;
        }
    }
    writeln!(out, "finished")?;
    Ok(())
}

#[cfg(unix)]
fn watch_signals(cancel: CancelToken) -> io::Result<signal_hook::iterator::Handle> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let handle = signals.handle();
    thread::Builder::new()
        .name("runmux-signals".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::info!(signal, "signal received, cancelling");
                cancel.cancel();
            }
        })?;
    Ok(handle)
}
