//! The rustic collaborators: argument construction and process execution.
//!
//! Argument building is kept pure so every builder is unit-testable without
//! rustic installed.  Execution comes in two flavours:
//!
//! - [`run_streamed`] captures the child's output.  stdout lines are printed
//!   through the [`StatusHandle`], stderr lines become spinner progress and
//!   are kept so they can be replayed in the error if the command fails.
//! - [`run_inherited`] lets the child own the terminal.  Used by `down`,
//!   which has no status display.
//!
//! # Root-relative targets
//!
//! Backup targets are paths inside the root directory: `/` is the root
//! itself, `/etc` is `<root>/etc`.  rustic runs with the root as its working
//! directory and, for a single target, records it with `--as-path` so the
//! snapshot looks like a backup of that path.
//!
//! # Privilege escalation
//!
//! [`prefix`] returns `["doas"]` when `--sudo` is set; otherwise it is
//! empty.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::{Context, Result, bail};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
};
use tracing::{debug, info};

use crate::{
    options::{BackupParams, GlobalOptions, RestoreParams},
    ui::StatusHandle,
};

// ─── Collaborator traits ──────────────────────────────────────────────────────

/// Something that can take a snapshot.
pub trait BackupOperation {
    fn backup(
        &self,
        params: &BackupParams,
        status: &StatusHandle,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Something that can restore a snapshot.
pub trait RestoreOperation {
    fn restore(&self, params: &RestoreParams) -> impl Future<Output = Result<()>> + Send;
}

/// The real thing: shells out to `rustic`.
#[derive(Debug, Clone)]
pub struct Rustic {
    program: String,
}

impl Default for Rustic {
    fn default() -> Self {
        Self {
            program: "rustic".into(),
        }
    }
}

impl BackupOperation for Rustic {
    async fn backup(&self, params: &BackupParams, status: &StatusHandle) -> Result<()> {
        require_repo(&params.global)?;
        let args = build_backup_args(&self.program, params);
        info!(root = %params.backup.root.display(), "starting backup");
        run_streamed(&args, &params.backup.root, status).await
    }
}

impl RestoreOperation for Rustic {
    async fn restore(&self, params: &RestoreParams) -> Result<()> {
        require_repo(&params.global)?;
        let args = build_restore_args(&self.program, params)?;
        info!(dest = %params.restore.target.display(), "starting restore");
        run_inherited(&args).await
    }
}

fn require_repo(global: &GlobalOptions) -> Result<()> {
    if global.repo.is_empty() {
        bail!(
            "no repository given: set `remote` in {} or pass --repo",
            crate::config::CONFIG_FILE
        );
    }
    Ok(())
}

// ─── Privilege prefix ─────────────────────────────────────────────────────────

/// Returns `["doas"]` when `sudo` is set, otherwise an empty `Vec`.
pub fn prefix(global: &GlobalOptions) -> Vec<String> {
    if global.sudo {
        vec!["doas".into()]
    } else {
        vec![]
    }
}

// ─── Argument builders ────────────────────────────────────────────────────────

/// Builds the argument list shared by every invocation:
///
/// ```text
/// [doas]  rustic  -r <repo>  --password <password>
/// ```
pub fn rustic_base(program: &str, global: &GlobalOptions) -> Vec<String> {
    let mut cmd = prefix(global);
    cmd.push(program.into());
    cmd.extend([
        "-r".into(),
        global.repo.clone(),
        "--password".into(),
        global.password.clone(),
    ]);
    cmd
}

/// Map a root-relative target onto the real filesystem.
pub fn rooted(root: &Path, target: &str) -> PathBuf {
    let rel = target.trim_start_matches('/');
    if rel.is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

/// Arguments for `rustic backup …`.
pub fn build_backup_args(program: &str, params: &BackupParams) -> Vec<String> {
    let opts = &params.backup;
    let mut cmd = rustic_base(program, &params.global);
    cmd.push("backup".into());
    if !opts.host.is_empty() {
        cmd.extend(["--host".into(), opts.host.clone()]);
    }
    for pattern in &opts.excludes {
        cmd.push(format!("--glob=!{pattern}"));
    }
    if opts.ignore_inode {
        cmd.push("--ignore-inode".into());
    }
    if let [target] = params.targets.as_slice() {
        cmd.extend(["--as-path".into(), target.clone()]);
    }
    cmd.extend(
        params
            .targets
            .iter()
            .map(|t| rooted(&opts.root, t).to_string_lossy().into_owned()),
    );
    cmd
}

/// Arguments for `rustic restore …`.  Exactly one snapshot can be restored.
pub fn build_restore_args(program: &str, params: &RestoreParams) -> Result<Vec<String>> {
    let [snapshot] = params.snapshots.as_slice() else {
        bail!(
            "restore needs exactly one snapshot, got {}",
            params.snapshots.len()
        );
    };
    let opts = &params.restore;
    let mut cmd = rustic_base(program, &params.global);
    cmd.push("restore".into());
    if !opts.host.is_empty() {
        cmd.extend(["--filter-host".into(), opts.host.clone()]);
    }
    cmd.push(snapshot.clone());
    cmd.push(opts.target.to_string_lossy().into_owned());
    Ok(cmd)
}

/// Render `args` for messages, hiding the password.
pub fn display_command(args: &[String]) -> String {
    let mut out = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            out.push("***");
            hide_next = false;
        } else {
            hide_next = arg == "--password";
            out.push(arg.as_str());
        }
    }
    out.join(" ")
}

// ─── Execution ────────────────────────────────────────────────────────────────

/// Run a command in `cwd`, streaming its output to `status`.
///
/// Fails if the command cannot be spawned or exits non-zero; in the latter
/// case the error carries everything the command wrote to stderr.
pub async fn run_streamed(args: &[String], cwd: &Path, status: &StatusHandle) -> Result<()> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;
    let shown = display_command(args);
    debug!(command = %shown, cwd = %cwd.display(), "spawning");

    let mut child = Command::new(prog)
        .args(rest)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn: {shown}"))?;

    let stdout = child.stdout.take().context("child stdout was not captured")?;
    let stderr = child.stderr.take().context("child stderr was not captured")?;

    let forward = async {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            status.print(line);
        }
        Ok::<_, std::io::Error>(())
    };
    let collect = async {
        let mut captured = Vec::new();
        let mut lines = BufReader::new(stderr).lines();
        while let Some(line) = lines.next_line().await? {
            status.progress(line.clone());
            captured.push(line);
        }
        Ok::<_, std::io::Error>(captured)
    };

    let (forwarded, captured, exit) = tokio::join!(forward, collect, child.wait());
    let exit = exit.with_context(|| format!("waiting for: {shown}"))?;
    forwarded.context("reading command output")?;
    let captured = captured.context("reading command errors")?;

    if !exit.success() {
        let mut msg = format!("command exited with {exit}: {shown}");
        if !captured.is_empty() {
            msg.push_str("\n\nstderr:\n");
            msg.push_str(&captured.join("\n"));
        }
        bail!(msg);
    }
    Ok(())
}

/// Run a command attached to the parent's stdio.
pub async fn run_inherited(args: &[String]) -> Result<()> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;
    let shown = display_command(args);
    debug!(command = %shown, "spawning");

    let exit = Command::new(prog)
        .args(rest)
        .status()
        .await
        .with_context(|| format!("failed to spawn: {shown}"))?;

    if !exit.success() {
        bail!("command exited with {exit}: {shown}");
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
