//! Per-directory configuration: `.rustic.yaml`.
//!
//! `Config` is a direct mapping of the file.  All three keys are optional and
//! anything else in the document is ignored, so the same file can carry notes
//! for other tools.
//!
//! # File format
//!
//! ```yaml
//! host: server1
//! remote: s3:bucket/repo
//! excludes:
//!   - "*.tmp"
//!   - cache/
//! ```
//!
//! An empty string or an empty `excludes` list means "not set": the value on
//! the command line (or rustic's own default) is kept.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Error;

/// Name of the config file looked up inside the target directory.
pub const CONFIG_FILE: &str = ".rustic.yaml";

// ─── Config ───────────────────────────────────────────────────────────────────

/// Parsed `.rustic.yaml`.  Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Host label recorded on (and used to select) snapshots.
    #[serde(default)]
    pub host: Option<String>,

    /// Repository location, e.g. `/mnt/backups/repo` or `s3:bucket/repo`.
    #[serde(default)]
    pub remote: Option<String>,

    /// Exclude patterns, applied to `up` only.
    #[serde(default)]
    pub excludes: Option<Vec<String>>,
}

impl Config {
    /// `host`, unless absent or empty.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().filter(|h| !h.is_empty())
    }

    /// `remote`, unless absent or empty.
    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref().filter(|r| !r.is_empty())
    }

    /// `excludes`, unless absent or empty.
    pub fn excludes(&self) -> Option<&[String]> {
        self.excludes.as_deref().filter(|e| !e.is_empty())
    }
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Path of the config file for `dir`.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Read and parse `<dir>/.rustic.yaml`.
///
/// A missing file is an error here; see [`load_optional`] for the lenient
/// variant.
pub fn load(dir: &Path) -> Result<Config, Error> {
    let path = config_path(dir);
    debug!(path = %path.display(), "reading config");

    let text = std::fs::read_to_string(&path).map_err(|source| Error::ConfigUnreadable {
        path: path.clone(),
        source,
    })?;

    parse(&text).map_err(|source| Error::ConfigMalformed { path, source })
}

/// Like [`load`], but a missing file yields an empty [`Config`].
///
/// Any other read failure, and any parse failure, is still returned.
pub fn load_optional(dir: &Path) -> Result<Config, Error> {
    match load(dir) {
        Err(Error::ConfigUnreadable { path, source })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            warn!(path = %path.display(), "config file not found, using command-line values only");
            Ok(Config::default())
        },
        other => other,
    }
}

/// Parse a config document.  An empty document is an empty config.
fn parse(text: &str) -> Result<Config, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Config::default());
    }
    // A document holding only comments deserialises as `null`.
    let cfg: Option<Config> = serde_yaml::from_str(text)?;
    Ok(cfg.unwrap_or_default())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
