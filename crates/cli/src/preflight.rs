//! Renderer preflight check.
//!
//! Confirms the renderer exists and is executable before any worker is
//! launched, so a bad `--renderer` is a startup error rather than a launch
//! failure in the middle of a run.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("Renderer not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Renderer is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Renderer {} is not executable (mode {mode:#o})", path.display())]
    PermissionDenied { path: PathBuf, mode: u32 },
}

/// Check `renderer` and return its absolute path.
///
/// The renderer is always treated as a filesystem path (never looked up on
/// `PATH`). The canonical path is returned so workers started in another
/// working directory still find it.
pub async fn check_renderer(renderer: &Path) -> Result<PathBuf, PreflightError> {
    let metadata = tokio::fs::metadata(renderer)
        .await
        .map_err(|_| PreflightError::NotFound(renderer.to_path_buf()))?;

    if !metadata.is_file() {
        return Err(PreflightError::NotAFile(renderer.to_path_buf()));
    }

    let mode = metadata.permissions().mode();
    if mode & 0o111 == 0 {
        return Err(PreflightError::PermissionDenied {
            path: renderer.to_path_buf(),
            mode,
        });
    }

    tokio::fs::canonicalize(renderer)
        .await
        .map_err(|_| PreflightError::NotFound(renderer.to_path_buf()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
