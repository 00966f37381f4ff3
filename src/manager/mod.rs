//! Materializing templates on disk.
//!
//! A [`SourceManager`] owns the templates directory under the ironman home.
//! It fetches templates from a remote locator (`install`/`update`), links
//! local paths into the directory (`link`/`unlink`) and removes them again.
//!
//! Backends share the purely local operations through [`TemplatesDir`] and only
//! implement the transport themselves. Every backend implements every
//! operation; nothing here aborts the process as "not implemented".
//!
//! Fetching is async because it spawns a subprocess or talks to the network.
//! Removal is synchronous so that rollback can run from a `Drop` guard even
//! when the surrounding future is cancelled.

mod git;

pub use git::GitManager;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::GIT_SUFFIX;
use crate::core::IronmanError;
use crate::utils::platform::{absolute_path, remove_symlink_dir, symlink_dir};

/// Transport-agnostic management of the templates directory.
pub trait SourceManager: Send + Sync {
    /// Fetch the template at `locator` and return the directory name it was
    /// materialized under.
    ///
    /// # Errors
    ///
    /// - [`IronmanError::LocationOccupied`] when the derived directory exists
    /// - [`IronmanError::FetchFailed`] on transport failure
    fn install<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String>>;

    /// Refresh a previously installed template in place. "Nothing changed"
    /// is success.
    fn update<'a>(&'a self, directory_name: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Remove an installed template's directory tree.
    fn uninstall(&self, directory_name: &str) -> Result<()>;

    /// Symlink `path` into the templates directory under `id`.
    ///
    /// # Errors
    ///
    /// - [`IronmanError::PathNotFound`] when `path` does not exist
    /// - [`IronmanError::LocationOccupied`] when `id` is already taken
    fn link(&self, path: &Path, id: &str) -> Result<PathBuf>;

    /// Remove the symlink for `id`, never its target.
    fn unlink(&self, id: &str) -> Result<()>;

    /// Where a template with this directory name lives. Pure; no I/O.
    fn template_location(&self, directory_name: &str) -> PathBuf;
}

/// Check that `id` can safely be used as a single directory name.
///
/// # Errors
///
/// [`IronmanError::InvalidTemplateId`] for empty names, `.`/`..`, path
/// separators or other unsupported characters.
pub fn validate_template_id(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        "a template ID cannot be empty"
    } else if id == "." || id == ".." {
        "a template ID cannot be '.' or '..'"
    } else if id.contains('/') || id.contains('\\') {
        "a template ID cannot contain path separators"
    } else if !id.starts_with(|c: char| c.is_ascii_alphanumeric())
        || !id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        "a template ID may only contain letters, digits, '.', '_' and '-', and must start with a letter or digit"
    } else {
        return Ok(());
    };

    Err(IronmanError::InvalidTemplateId {
        id: id.to_string(),
        reason: reason.to_string(),
    }
    .into())
}

/// Derive the template directory name from a locator: the last path segment
/// with trailing slashes and a `.git` suffix removed.
///
/// Works for URLs, scp-style `host:org/repo.git` locators and local paths.
///
/// # Errors
///
/// [`IronmanError::InvalidTemplateId`] when no usable name remains.
pub fn directory_name_from_locator(locator: &str) -> Result<String> {
    let trimmed = locator.trim().trim_end_matches(['/', '\\']);
    let trimmed = trimmed.strip_suffix(GIT_SUFFIX).unwrap_or(trimmed);
    let name = trimmed.rsplit(['/', '\\', ':']).next().unwrap_or_default().to_string();

    validate_template_id(&name)
        .with_context(|| format!("Cannot derive a template directory name from '{locator}'"))?;
    Ok(name)
}

/// The local half of every [`SourceManager`]: path layout, removal and links.
#[derive(Debug, Clone)]
pub struct TemplatesDir {
    root: PathBuf,
}

impl TemplatesDir {
    /// Manage templates under `root` (usually `<home>/templates`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn location(&self, directory_name: &str) -> PathBuf {
        self.root.join(directory_name)
    }

    /// Fail with [`IronmanError::LocationOccupied`] when anything, including
    /// a dangling symlink, sits at the location for `directory_name`.
    pub fn ensure_vacant(&self, directory_name: &str) -> Result<PathBuf> {
        let location = self.location(directory_name);
        if location.symlink_metadata().is_ok() {
            return Err(IronmanError::LocationOccupied {
                path: location.display().to_string(),
            }
            .into());
        }
        Ok(location)
    }

    pub fn uninstall(&self, directory_name: &str) -> Result<()> {
        validate_template_id(directory_name)?;
        let location = self.location(directory_name);

        let metadata = match location.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Template directory {} already absent", location.display());
                return Ok(());
            }
            Err(e) => return Err(IronmanError::from_io("inspect", &location, &e).into()),
        };

        let removed = if metadata.file_type().is_symlink() {
            remove_symlink_dir(&location)
        } else {
            std::fs::remove_dir_all(&location)
        };
        removed.map_err(|e| IronmanError::from_io("remove", &location, &e))?;

        info!("Removed template directory {}", location.display());
        Ok(())
    }

    pub fn link(&self, path: &Path, id: &str) -> Result<PathBuf> {
        validate_template_id(id)?;

        if !path.exists() {
            return Err(IronmanError::PathNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let link_path = self.ensure_vacant(id)?;
        let target = absolute_path(path)?;

        crate::utils::fs::ensure_dir(&self.root)?;
        symlink_dir(&target, &link_path).map_err(|e| IronmanError::from_io("link", &link_path, &e))?;

        info!("Linked {} as template '{}'", target.display(), id);
        Ok(link_path)
    }

    pub fn unlink(&self, id: &str) -> Result<()> {
        validate_template_id(id)?;
        let link_path = self.location(id);

        let metadata = link_path.symlink_metadata().map_err(|_| IronmanError::PathNotFound {
            path: link_path.display().to_string(),
        })?;

        if !metadata.file_type().is_symlink() {
            return Err(IronmanError::NotALink {
                path: link_path.display().to_string(),
            }
            .into());
        }

        remove_symlink_dir(&link_path).map_err(|e| IronmanError::from_io("unlink", &link_path, &e))?;

        info!("Unlinked template '{}'", id);
        Ok(())
    }
}
