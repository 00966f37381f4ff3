//! Shared helpers for the integration suite.

#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use ironman::test_utils::{TemplateFixture, TestGit};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway ironman home plus room for template sources and output.
pub struct TestHome {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    home: PathBuf,
    sources_dir: PathBuf,
    work_dir: PathBuf,
}

impl TestHome {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let home = temp_dir.path().join("home");
        let sources_dir = temp_dir.path().join("sources");
        let work_dir = temp_dir.path().join("work");

        fs::create_dir_all(&sources_dir)?;
        fs::create_dir_all(&work_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            home,
            sources_dir,
            work_dir,
        })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn sources_path(&self) -> &Path {
        &self.sources_dir
    }

    pub fn work_path(&self) -> &Path {
        &self.work_dir
    }

    /// Write `fixture` under the sources directory and commit it to a fresh
    /// git repository.
    pub fn create_template_repo(&self, fixture: &TemplateFixture) -> Result<PathBuf> {
        let path = fixture.write_to(&self.sources_dir)?;
        TestGit::new(&path).init_with_commit("Initial template").context("Failed to commit template")?;
        Ok(path)
    }

    /// Write `fixture` under the sources directory without git.
    pub fn create_template_folder(&self, fixture: &TemplateFixture) -> Result<PathBuf> {
        fixture.write_to(&self.sources_dir)
    }

    /// The ironman binary, pointed at this home and run from the work directory.
    pub fn ironman(&self) -> Command {
        let mut cmd = Command::cargo_bin("ironman").expect("ironman binary is built");
        cmd.arg("--home")
            .arg(&self.home)
            .current_dir(&self.work_dir)
            .env_remove("IRONMAN_HOME")
            .env_remove("RUST_LOG")
            .env("IRONMAN_NO_PROGRESS", "1")
            .env("NO_COLOR", "1");
        cmd
    }
}

/// File assertion helpers
pub struct FileAssert;

impl FileAssert {
    pub fn exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    pub fn not_exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(path.symlink_metadata().is_err(), "Expected file to not exist: {}", path.display());
    }

    pub fn equals(path: impl AsRef<Path>, expected: &str) {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
        assert_eq!(content, expected, "File {} content mismatch", path.display());
    }
}
