//! A [`SourceManager`] that copies local folders instead of cloning.

use anyhow::{Result, bail};
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::IronmanError;
use crate::manager::{SourceManager, TemplatesDir, directory_name_from_locator, validate_template_id};

/// Installs by copying the folder named by the locator.
#[derive(Debug, Clone)]
pub struct CopyManager {
    templates: TemplatesDir,
    fail_removal: bool,
}

impl CopyManager {
    pub fn new(templates_root: impl Into<PathBuf>) -> Self {
        Self {
            templates: TemplatesDir::new(templates_root),
            fail_removal: false,
        }
    }

    /// Make `uninstall` and `unlink` fail, to exercise rollback failures.
    #[must_use]
    pub const fn failing_removal(mut self) -> Self {
        self.fail_removal = true;
        self
    }

    fn copy(locator: &str, location: &Path) -> Result<()> {
        let source = Path::new(locator);
        if !source.is_dir() {
            return Err(IronmanError::FetchFailed {
                locator: locator.to_string(),
                reason: "not a local directory".to_string(),
            }
            .into());
        }

        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry?;
            let relative = entry.path().strip_prefix(source)?;
            let target = location.join(relative);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)?;
            } else {
                std::fs::copy(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    fn check_removal(&self, name: &str) -> Result<()> {
        if self.fail_removal {
            bail!("Refusing to remove {name}");
        }
        Ok(())
    }
}

impl SourceManager for CopyManager {
    fn install<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let directory_name = directory_name_from_locator(locator)?;
            let location = self.templates.ensure_vacant(&directory_name)?;
            Self::copy(locator, &location)?;
            Ok(directory_name)
        })
    }

    fn update<'a>(&'a self, directory_name: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            validate_template_id(directory_name)?;
            let location = self.templates.location(directory_name);
            if !location.is_dir() {
                return Err(IronmanError::PathNotFound {
                    path: location.display().to_string(),
                }
                .into());
            }
            Ok(())
        })
    }

    fn uninstall(&self, directory_name: &str) -> Result<()> {
        self.check_removal(directory_name)?;
        self.templates.uninstall(directory_name)
    }

    fn link(&self, path: &Path, id: &str) -> Result<PathBuf> {
        self.templates.link(path, id)
    }

    fn unlink(&self, id: &str) -> Result<()> {
        self.check_removal(id)?;
        self.templates.unlink(id)
    }

    fn template_location(&self, directory_name: &str) -> PathBuf {
        self.templates.location(directory_name)
    }
}
