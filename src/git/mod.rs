//! Git operations used to fetch and refresh templates.
//!
//! Ironman shells out to the system `git` rather than linking a git library,
//! so authentication, proxies and credential helpers behave exactly as they do
//! on the user's command line.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ironman::git::GitRepo;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GitRepo::clone("https://github.com/ironman-project/template-example.git", "/tmp/example", None).await?;
//! repo.pull(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod command_builder;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use command_builder::GitCommand;

use crate::core::IronmanError;

/// A local git working copy.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Clone `url` into `target`.
    ///
    /// # Errors
    ///
    /// [`IronmanError::FetchFailed`] when git cannot clone the URL.
    pub async fn clone(url: &str, target: impl AsRef<Path>, timeout: Option<Duration>) -> Result<Self> {
        let target = target.as_ref();
        GitCommand::clone(url, target)
            .with_timeout(timeout)
            .with_context(format!("install {url}"))
            .execute()
            .await?;
        Ok(Self::new(target))
    }

    /// Fast-forward the working copy from its upstream.
    ///
    /// Being already up to date is success.
    pub async fn pull(&self, timeout: Option<Duration>) -> Result<()> {
        GitCommand::pull()
            .current_dir(&self.path)
            .with_timeout(timeout)
            .with_context(format!("update {}", self.path.display()))
            .execute()
            .await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether a git executable is on the `PATH`.
#[must_use]
pub fn is_git_installed() -> bool {
    which::which(crate::utils::platform::get_git_command()).is_ok()
}

/// Fail with [`IronmanError::GitNotFound`] when git is unavailable.
pub fn ensure_git_available() -> Result<()> {
    if is_git_installed() {
        Ok(())
    } else {
        Err(IronmanError::GitNotFound.into())
    }
}
