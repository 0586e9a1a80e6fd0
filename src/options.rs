//! Runtime parameters and the rules that merge `.rustic.yaml` into them.
//!
//! The command line supplies a baseline ([`GlobalOptions`] plus the
//! operation-specific [`BackupOptions`] / [`RestoreOptions`]).  The resolver
//! copies that baseline, applies the config on top and fixes the fields that
//! are always derived from the target directory.  Nothing is mutated in
//! place: the same inputs always produce the same parameters.
//!
//! # Precedence
//!
//! | Field                | `up`                          | `down`                  |
//! |----------------------|-------------------------------|-------------------------|
//! | repository           | `remote` if set, else `--repo`| same                    |
//! | host                 | `host` if set, else `--host`  | same                    |
//! | excludes             | `excludes` if set (replaces)  | never read              |
//! | ignore inode         | always on                     | n/a                     |
//! | root / target dir    | the directory                 | the directory           |
//! | targets / snapshots  | `["/"]`                       | `["latest"]`            |

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::config::Config;

/// Backup target: the whole tree as seen from the root directory.
pub const ROOT_TARGET: &str = "/";

/// Snapshot selector for the most recent snapshot.
pub const LATEST_SNAPSHOT: &str = "latest";

// ─── Baseline types ───────────────────────────────────────────────────────────

/// Settings shared by every rustic invocation.
///
/// `Debug` masks the password; these values end up in `--print-config`
/// output and debug logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Repository location passed as `-r`.
    pub repo: String,
    /// Repository password; empty means an unencrypted repository.
    pub password: String,
    /// Prefix commands with `doas`.
    pub sudo: bool,
    /// Hide the status display.
    pub quiet: bool,
}

impl fmt::Debug for GlobalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("GlobalOptions")
            .field("repo", &self.repo)
            .field("password", &password)
            .field("sudo", &self.sudo)
            .field("quiet", &self.quiet)
            .finish()
    }
}

/// Backup-only settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupOptions {
    /// Host label; empty leaves the choice to rustic.
    pub host: String,
    /// Exclude patterns.
    pub excludes: Vec<String>,
    /// Do not treat an inode change as a file change.
    pub ignore_inode: bool,
    /// Directory the backup targets are resolved against.
    pub root: PathBuf,
}

/// Restore-only settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Only consider snapshots recorded with this host; empty means any.
    pub host: String,
    /// Directory the snapshot is restored into.
    pub target: PathBuf,
}

// ─── Resolved parameters ──────────────────────────────────────────────────────

/// Everything an `up` run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupParams {
    pub global: GlobalOptions,
    pub backup: BackupOptions,
    /// Paths to back up, relative to `backup.root`.
    pub targets: Vec<String>,
}

/// Everything a `down` run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreParams {
    pub global: GlobalOptions,
    pub restore: RestoreOptions,
    /// Snapshot selectors.
    pub snapshots: Vec<String>,
}

// ─── Resolver ─────────────────────────────────────────────────────────────────

fn resolve_global(cfg: &Config, baseline: &GlobalOptions) -> GlobalOptions {
    let mut global = baseline.clone();
    if let Some(remote) = cfg.remote() {
        global.repo = remote.to_owned();
    }
    global
}

fn resolve_host(cfg: &Config, baseline: &str) -> String {
    cfg.host().unwrap_or(baseline).to_owned()
}

/// Parameters for backing up `dir`.
pub fn resolve_backup(
    cfg: &Config,
    global: &GlobalOptions,
    baseline: &BackupOptions,
    dir: &Path,
) -> BackupParams {
    let excludes = cfg
        .excludes()
        .map_or_else(|| baseline.excludes.clone(), <[String]>::to_vec);

    BackupParams {
        global: resolve_global(cfg, global),
        backup: BackupOptions {
            host: resolve_host(cfg, &baseline.host),
            excludes,
            ignore_inode: true,
            root: dir.to_path_buf(),
        },
        targets: vec![ROOT_TARGET.into()],
    }
}

/// Parameters for restoring the latest snapshot into `dir`.
pub fn resolve_restore(
    cfg: &Config,
    global: &GlobalOptions,
    baseline: &RestoreOptions,
    dir: &Path,
) -> RestoreParams {
    RestoreParams {
        global: resolve_global(cfg, global),
        restore: RestoreOptions {
            host: resolve_host(cfg, &baseline.host),
            target: dir.to_path_buf(),
        },
        snapshots: vec![LATEST_SNAPSHOT.into()],
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
