//! Point-in-time copies of cookie stores.
//!
//! A running browser keeps its store open (and often locked), so reads go
//! against a private copy in a temporary directory. The copy, including any
//! `-wal` journal, is removed when the [`Snapshot`] is dropped, whatever the
//! outcome of the read. When the copy cannot be made, the snapshot points at the
//! live file instead and records why, so callers can surface the degraded read.

use crate::base::auditerror::AuditError;
use crate::base::context::IoResultExt;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// How the store behind a [`Snapshot`] is being read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SnapshotMode {
    /// Reading a private copy.
    Copied,
    /// Reading the live file because the copy failed.
    Direct { reason: String },
}

impl SnapshotMode {
    pub fn is_degraded(&self) -> bool {
        matches!(self, SnapshotMode::Direct { .. })
    }
}

/// Scoped snapshot of a cookie store file.
#[derive(Debug)]
pub struct Snapshot {
    path: PathBuf,
    mode: SnapshotMode,
    // Held for its Drop: removes the copy.
    dir: Option<TempDir>,
}

impl Snapshot {
    /// Copy `source` (and its `-wal` sidecar, if any) into a fresh temporary directory.
    ///
    /// A missing source is an error. A failed copy is not: the snapshot falls
    /// back to `source` itself with [`SnapshotMode::Direct`].
    pub fn take(source: &Path) -> Result<Self, AuditError> {
        Self::take_in(source, &std::env::temp_dir())
    }

    /// Like [`Snapshot::take`], with the temporary directory created under `base`.
    pub fn take_in(source: &Path, base: &Path) -> Result<Self, AuditError> {
        let metadata = std::fs::metadata(source).store_context(source)?;
        if !metadata.is_file() {
            return Err(AuditError::unreadable(
                source.display().to_string(),
                "not a regular file",
            ));
        }

        match copy_to_temp(source, base) {
            Ok((dir, path)) => {
                tracing::debug!(source = %source.display(), copy = %path.display(), "cookie store snapshot taken");
                Ok(Self {
                    path,
                    mode: SnapshotMode::Copied,
                    dir: Some(dir),
                })
            }
            Err(e) => {
                let warning = AuditError::copy_failed(source.display().to_string(), e.to_string());
                tracing::warn!(error = %warning, "reading live cookie store; it may be locked by a running browser");
                Ok(Self::direct(source, e.to_string()))
            }
        }
    }

    /// Read `source` in place without attempting a copy.
    pub fn direct(source: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: source.to_path_buf(),
            mode: SnapshotMode::Direct {
                reason: reason.into(),
            },
            dir: None,
        }
    }

    /// Path the reader should open.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> &SnapshotMode {
        &self.mode
    }

    /// Whether `path()` is a private copy that may be opened for writing.
    pub fn is_copy(&self) -> bool {
        self.dir.is_some()
    }

    /// The `CopyFailed` warning to report for a degraded snapshot.
    pub fn warning(&self, source: &Path) -> Option<AuditError> {
        match &self.mode {
            SnapshotMode::Copied => None,
            SnapshotMode::Direct { reason } => Some(AuditError::copy_failed(
                source.display().to_string(),
                reason.clone(),
            )),
        }
    }
}

fn copy_to_temp(source: &Path, base: &Path) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = tempfile::Builder::new()
        .prefix("cookieaudit-")
        .tempdir_in(base)?;
    let file_name = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "Cookies".into());
    let target = dir.path().join(&file_name);
    std::fs::copy(source, &target)?;

    let wal = sidecar(source, "-wal");
    if wal.is_file() {
        std::fs::copy(&wal, sidecar(&target, "-wal"))?;
    }

    Ok((dir, target))
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
