//! Terminal status display — the spinner that runs next to a backup.
//!
//! [`Terminal`] is the background half: it owns the spinner and the output
//! sinks and runs as a [`StatusTask`] until its lifetime is cancelled.
//! [`StatusHandle`] is the foreground half: the operation holds it and sends
//! progress messages and log lines through it without touching the terminal
//! directly.
//!
//! ```text
//!   operation ──StatusHandle──► mpsc ──► Terminal::run ──► spinner (stderr)
//!                                                    └───► lines   (stdout)
//! ```
//!
//! Both sinks are injectable so tests can render into a buffer and a hidden
//! draw target.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::session::StatusTask;

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames — same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Green ✓  — printed when an operation succeeds.
fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}

/// Print the one-line success summary for `label`.
pub fn print_ok(label: &str) {
    println!("  {}  {}", icon_ok(), style(label).bold());
}

// ─── Messages ─────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum StatusEvent {
    /// Replace the text next to the spinner.
    Progress(String),
    /// Print a line above the spinner.
    Print(String),
}

/// Sending side of the status display.  Cheap to clone.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl StatusHandle {
    /// Show `msg` next to the spinner.
    pub fn progress(&self, msg: impl Into<String>) {
        // The display may already be gone; progress is best-effort.
        let _ = self.tx.send(StatusEvent::Progress(msg.into()));
    }

    /// Print `line` to the output sink without disturbing the spinner.
    pub fn print(&self, line: impl Into<String>) {
        let _ = self.tx.send(StatusEvent::Print(line.into()));
    }
}

// ─── Terminal ─────────────────────────────────────────────────────────────────

/// Background status renderer.
pub struct Terminal {
    label: String,
    out: Box<dyn Write + Send>,
    draw: ProgressDrawTarget,
    rx: mpsc::UnboundedReceiver<StatusEvent>,
}

impl Terminal {
    /// Build a renderer writing lines to `out` and drawing the spinner to
    /// `draw`, plus the handle that feeds it.
    pub fn new(
        label: impl Into<String>,
        out: Box<dyn Write + Send>,
        draw: ProgressDrawTarget,
    ) -> (Self, StatusHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let term = Self {
            label: label.into(),
            out,
            draw,
            rx,
        };
        (term, StatusHandle { tx })
    }

    /// Renderer on the process's stdout/stderr.  `quiet` hides the spinner.
    pub fn stdio(label: impl Into<String>, quiet: bool) -> (Self, StatusHandle) {
        let draw = if quiet {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        Self::new(label, Box::new(std::io::stdout()), draw)
    }

    fn apply(&mut self, spinner: &ProgressBar, event: StatusEvent) -> Result<()> {
        trace!(?event, "status event");
        match event {
            StatusEvent::Progress(msg) => {
                spinner.set_message(format!("{} {}", style(&self.label).dim(), msg));
                Ok(())
            },
            StatusEvent::Print(line) => {
                let out = &mut self.out;
                spinner
                    .suspend(|| writeln!(out, "{line}").and_then(|()| out.flush()))
                    .context("writing status output")
            },
        }
    }

    async fn render(&mut self, spinner: &ProgressBar, lifetime: &CancellationToken) -> Result<()> {
        loop {
            tokio::select! {
                biased;
                () = lifetime.cancelled() => break,
                event = self.rx.recv() => match event {
                    Some(event) => self.apply(spinner, event)?,
                    None => {
                        // Every handle is gone; nothing left to show.
                        lifetime.cancelled().await;
                        break;
                    },
                },
            }
        }

        // Flush whatever was sent before the operation returned.
        while let Ok(event) = self.rx.try_recv() {
            self.apply(spinner, event)?;
        }
        Ok(())
    }
}

/// Create and start an indeterminate spinner for `label` on `draw`.
fn make_spinner(label: &str, draw: ProgressDrawTarget) -> Result<ProgressBar> {
    let pb = ProgressBar::with_draw_target(None, draw);
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan}  {msg}")?.tick_chars(SPINNER_CHARS),
    );
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

impl StatusTask for Terminal {
    async fn run(mut self, lifetime: CancellationToken) -> Result<()> {
        let draw = std::mem::replace(&mut self.draw, ProgressDrawTarget::hidden());
        let spinner = make_spinner(&self.label, draw)?;

        let result = self.render(&spinner, &lifetime).await;
        spinner.finish_and_clear();
        result
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
