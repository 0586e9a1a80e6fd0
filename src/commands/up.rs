//! `updown up [DIR]` — supervised backup.
//!
//! # Steps
//!
//! | # | Step            | Failure                                   |
//! |---|-----------------|-------------------------------------------|
//! | 1 | Resolve `DIR`   | usage error (more than one argument)      |
//! | 2 | Load config     | `error while reading config: …`           |
//! | 3 | Resolve params  | cannot fail                               |
//! | 4 | Backup          | `backup failed: …`, or a drain failure    |
//!
//! Step 4 runs under [`crate::session::supervise`] with the spinner from
//! [`crate::ui::Terminal`] as the background task.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    cli::Cli,
    commands::{read_config, resolve_dir},
    options::{BackupParams, resolve_backup},
    runner::BackupOperation,
    session,
    ui::{self, Terminal},
};

/// Resolve the directory and parameters for a backup without running it.
pub fn prepare(cli: &Cli, args: &[PathBuf]) -> Result<BackupParams> {
    let dir = resolve_dir(args)?;
    let cfg = read_config(cli, &dir)?;
    let params = resolve_backup(&cfg, &cli.global_options(), &cli.backup_options(), &dir);
    debug!(?params, "resolved backup parameters");
    Ok(params)
}

/// Entry point for `up`.
pub async fn run<B: BackupOperation>(cli: &Cli, args: &[PathBuf], op: &B) -> Result<()> {
    let params = prepare(cli, args)?;

    if cli.print_config {
        println!("{params:#?}");
        return Ok(());
    }

    info!(root = %params.backup.root.display(), repo = %params.global.repo, "up");
    let (term, status) = Terminal::stdio("Backup", params.global.quiet);
    session::supervise(term, async {
        op.backup(&params, &status).await.context("backup failed")
    })
    .await?;

    ui::print_ok("Backup");
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
