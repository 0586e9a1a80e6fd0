//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The global flags form the baseline that
//! `.rustic.yaml` is merged on top of; see [`crate::options`].

use std::path::PathBuf;

use clap::Parser;

use crate::options::{BackupOptions, GlobalOptions, RestoreOptions};

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "updown",
    about   = "Back up a directory with rustic, or restore it, driven by .rustic.yaml",
    version,
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Subcommand,

    /// Repository location.  `remote` in `.rustic.yaml` takes precedence.
    #[arg(short, long, global = true, default_value = "")]
    pub repo: String,

    /// Repository password.  Empty means an unencrypted repository.
    #[arg(long, global = true, default_value = "")]
    pub password: String,

    /// Host label for snapshots.  `host` in `.rustic.yaml` takes precedence.
    #[arg(long, global = true, default_value = "")]
    pub host: String,

    /// Exclude pattern (repeatable).  Replaced wholesale by `excludes` in
    /// `.rustic.yaml` when that list is non-empty.  Ignored by `down`.
    #[arg(long = "exclude", global = true, value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Print the resolved parameters and exit without running anything.
    ///
    /// Handy for verifying that `.rustic.yaml` was picked up correctly
    /// before committing to a long backup run.
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Treat a missing `.rustic.yaml` as an empty one instead of failing.
    #[arg(long, global = true)]
    pub allow_missing_config: bool,

    /// Hide the progress spinner.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (`-v` info, `-vv` debug, `-vvv` trace).
    ///
    /// `RUST_LOG` overrides this when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Elevate commands via `doas`.
    #[arg(long, global = true)]
    pub sudo: bool,
}

/// The two entry points.
#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
pub enum Subcommand {
    /// Back up a directory according to its `.rustic.yaml`.
    ///
    /// The directory (default: the current one) is backed up as `/`, with
    /// inode changes ignored so moved or copied trees are not re-read.
    Up {
        /// Directory to back up.  At most one.
        #[arg(value_name = "DIR")]
        args: Vec<PathBuf>,
    },

    /// Restore the latest snapshot into a directory according to its
    /// `.rustic.yaml`.
    ///
    /// Exclude patterns are not applied to restores.
    Down {
        /// Directory to restore into.  At most one.
        #[arg(value_name = "DIR")]
        args: Vec<PathBuf>,
    },
}

impl Cli {
    /// Repository-wide baseline.
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            repo: self.repo.clone(),
            password: self.password.clone(),
            sudo: self.sudo,
            quiet: self.quiet,
        }
    }

    /// Backup baseline.  `root` is filled in by the resolver.
    pub fn backup_options(&self) -> BackupOptions {
        BackupOptions {
            host: self.host.clone(),
            excludes: self.excludes.clone(),
            ..BackupOptions::default()
        }
    }

    /// Restore baseline.  `target` is filled in by the resolver.
    pub fn restore_options(&self) -> RestoreOptions {
        RestoreOptions {
            host: self.host.clone(),
            ..RestoreOptions::default()
        }
    }
}
