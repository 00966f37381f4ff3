//! [`SourceManager`] backed by `git clone` / `git pull`.

use anyhow::Result;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{SourceManager, TemplatesDir, directory_name_from_locator, validate_template_id};
use crate::constants::{GIT_CLONE_TIMEOUT, GIT_FETCH_TIMEOUT};
use crate::core::IronmanError;
use crate::git::{GitRepo, ensure_git_available};
use crate::utils::fs::{ensure_dir, remove_dir_all};

/// Fetches templates with the system git.
#[derive(Debug, Clone)]
pub struct GitManager {
    templates: TemplatesDir,
    clone_timeout: Duration,
    fetch_timeout: Duration,
}

impl GitManager {
    /// Manage templates under `templates_root` with the default timeouts.
    pub fn new(templates_root: impl Into<PathBuf>) -> Self {
        Self {
            templates: TemplatesDir::new(templates_root),
            clone_timeout: GIT_CLONE_TIMEOUT,
            fetch_timeout: GIT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeouts(mut self, clone_timeout: Duration, fetch_timeout: Duration) -> Self {
        self.clone_timeout = clone_timeout;
        self.fetch_timeout = fetch_timeout;
        self
    }

    async fn install_inner(&self, locator: &str) -> Result<String> {
        ensure_git_available()?;
        let directory_name = directory_name_from_locator(locator)?;
        let location = self.templates.ensure_vacant(&directory_name)?;
        ensure_dir(self.templates.root())?;

        debug!("Cloning {} into {}", locator, location.display());
        let partial = PartialClone {
            location: &location,
        };
        GitRepo::clone(locator, &location, Some(self.clone_timeout)).await?;
        std::mem::forget(partial);

        info!("Installed {} into {}", locator, location.display());
        Ok(directory_name)
    }

    async fn update_inner(&self, directory_name: &str) -> Result<()> {
        validate_template_id(directory_name)?;
        let location = self.templates.location(directory_name);
        if !location.is_dir() {
            return Err(IronmanError::PathNotFound {
                path: location.display().to_string(),
            }
            .into());
        }

        ensure_git_available()?;
        GitRepo::new(&location).pull(Some(self.fetch_timeout)).await?;
        info!("Updated {}", location.display());
        Ok(())
    }
}

/// Removes a clone target unless forgotten. Runs when the clone fails or the
/// install future is dropped mid-clone.
struct PartialClone<'a> {
    location: &'a Path,
}

impl Drop for PartialClone<'_> {
    fn drop(&mut self) {
        if let Err(e) = remove_dir_all(self.location) {
            warn!("Failed to remove partial clone {}: {}", self.location.display(), e);
        }
    }
}

impl SourceManager for GitManager {
    fn install<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.install_inner(locator))
    }

    fn update<'a>(&'a self, directory_name: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.update_inner(directory_name))
    }

    fn uninstall(&self, directory_name: &str) -> Result<()> {
        self.templates.uninstall(directory_name)
    }

    fn link(&self, path: &Path, id: &str) -> Result<PathBuf> {
        self.templates.link(path, id)
    }

    fn unlink(&self, id: &str) -> Result<()> {
        self.templates.unlink(id)
    }

    fn template_location(&self, directory_name: &str) -> PathBuf {
        self.templates.location(directory_name)
    }
}
