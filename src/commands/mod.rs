//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File       | Invocation        | Description                            |
//! |------------|-------------------|----------------------------------------|
//! | `up.rs`    | `updown up [DIR]`   | Supervised backup of `DIR`           |
//! | `down.rs`  | `updown down [DIR]` | Restore the latest snapshot into `DIR` |
//!
//! Both run the same front half: resolve the directory, load its config,
//! merge it into the command-line baseline.

pub mod down;
pub mod up;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    cli::Cli,
    config::{self, Config},
    error::Error,
};

/// The directory a command works on: the single argument, or the current
/// working directory when there is none.  Always absolute, since rustic is
/// started from inside it.
pub fn resolve_dir(args: &[PathBuf]) -> Result<PathBuf> {
    match args {
        [] => std::env::current_dir().context("resolving the current directory"),
        [dir] => std::path::absolute(dir)
            .with_context(|| format!("resolving directory {}", dir.display())),
        _ => Err(Error::Usage { count: args.len() }.into()),
    }
}

/// Load `.rustic.yaml` from `dir`, honouring `--allow-missing-config`.
pub fn read_config(cli: &Cli, dir: &Path) -> Result<Config> {
    let cfg = if cli.allow_missing_config {
        config::load_optional(dir)
    } else {
        config::load(dir)
    };
    cfg.context("error while reading config")
}
