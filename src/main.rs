//! `updown` — directory-scoped rustic backups driven by `.rustic.yaml`.
//!
//! # Overview
//!
//! Drop a `.rustic.yaml` into a directory, then `updown up` backs that
//! directory up and `updown down` restores the latest snapshot into it.  The
//! file names the repository, the host label and the exclude patterns; the
//! command line supplies the rest (and the fallback values).
//!
//! # Usage
//!
//! ```text
//! updown up                   # back up the current directory
//! updown up /data             # back up /data as "/"
//! updown down /data           # restore the latest snapshot into /data
//! updown up --print-config    # show resolved parameters without running
//! updown -r /mnt/repo up      # repository used when .rustic.yaml has no remote
//! ```
//!
//! # Module layout
//!
//! | Module                   | Responsibility                              |
//! |--------------------------|---------------------------------------------|
//! | [`cli`]                  | Argument types parsed by clap               |
//! | [`config`]               | `.rustic.yaml` loader                       |
//! | [`options`]              | Runtime parameters + config merge rules     |
//! | [`session`]              | Operation / status task supervision         |
//! | [`ui`]                   | Spinner status task                         |
//! | [`runner`]               | rustic argument building and execution      |
//! | [`commands::up`]         | `up` subcommand                             |
//! | [`commands::down`]       | `down` subcommand                           |
//! | [`error`]                | Typed failures                              |
//! | [`logging`]              | tracing subscriber setup                    |

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod options;
mod runner;
mod session;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Subcommand};
use runner::Rustic;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let rustic = Rustic::default();
    match &cli.command {
        Subcommand::Up { args } => commands::up::run(&cli, args, &rustic).await,
        Subcommand::Down { args } => commands::down::run(&cli, args, &rustic).await,
    }
}
