//! Platform-specific helpers.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Whether we are running on Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Name of the git executable for this platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Expand `~` and environment variables in a user-supplied path.
///
/// # Errors
///
/// Fails when an environment variable referenced by the path is not set.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(path).with_context(|| format!("Failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Make `path` absolute against the current directory without touching the
/// filesystem (symlinks are not resolved).
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Failed to get absolute path for {}", path.display()))
}

/// Create a symlink to a directory.
#[cfg(unix)]
pub fn symlink_dir(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

/// Create a symlink to a directory.
#[cfg(windows)]
pub fn symlink_dir(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(original, link)
}

/// Remove a directory symlink without touching its target.
pub fn remove_symlink_dir(link: &Path) -> std::io::Result<()> {
    // Windows directory symlinks are directories; Unix ones are files
    if is_windows() {
        std::fs::remove_dir(link)
    } else {
        std::fs::remove_file(link)
    }
}
