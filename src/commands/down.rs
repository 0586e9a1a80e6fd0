//! `updown down [DIR]` — restore the latest snapshot into `DIR`.
//!
//! Same front half as `up`, but the restore runs in the foreground with no
//! status task: rustic owns the terminal until it exits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    cli::Cli,
    commands::{read_config, resolve_dir},
    options::{RestoreParams, resolve_restore},
    runner::RestoreOperation,
    ui,
};

/// Resolve the directory and parameters for a restore without running it.
pub fn prepare(cli: &Cli, args: &[PathBuf]) -> Result<RestoreParams> {
    let dir = resolve_dir(args)?;
    let cfg = read_config(cli, &dir)?;
    let params = resolve_restore(&cfg, &cli.global_options(), &cli.restore_options(), &dir);
    debug!(?params, "resolved restore parameters");
    Ok(params)
}

/// Entry point for `down`.
pub async fn run<R: RestoreOperation>(cli: &Cli, args: &[PathBuf], op: &R) -> Result<()> {
    let params = prepare(cli, args)?;

    if cli.print_config {
        println!("{params:#?}");
        return Ok(());
    }

    info!(dest = %params.restore.target.display(), repo = %params.global.repo, "down");
    op.restore(&params).await.context("restore failed")?;

    ui::print_ok("Restore");
    Ok(())
}
