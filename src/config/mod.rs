//! Configuration for Ironman
//!
//! Ironman keeps everything under a single *home* directory:
//!
//! ```text
//! ~/.ironman/
//! ├── config.toml        # optional, see below
//! ├── templates.index    # the template index
//! └── templates/         # one folder or symlink per template
//! ```
//!
//! # Home resolution
//!
//! 1. The `--home` command line flag
//! 2. The `IRONMAN_HOME` environment variable
//! 3. `~/.ironman`
//!
//! Paths are `~`/`$VAR` expanded with `shellexpand`.
//!
//! # Configuration file (`<home>/config.toml`)
//!
//! Every key is optional; a missing file means defaults.
//!
//! ```toml
//! [git]
//! clone_timeout_secs = 120
//! fetch_timeout_secs = 60
//!
//! [metadata]
//! format = "yaml"          # or "json"
//! ignore = ["_*", "wip-*"] # generator folders to skip
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_HOME_DIRECTORY, GIT_CLONE_TIMEOUT, GIT_FETCH_TIMEOUT, HOME_ENV_VAR};
use crate::core::IronmanError;
use crate::model::Decoder;
use crate::utils::platform::resolve_path;

/// Contents of `<home>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub git: GitConfig,
    pub metadata: MetadataConfig,
}

/// Timeouts for git subprocesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    pub clone_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            clone_timeout_secs: GIT_CLONE_TIMEOUT.as_secs(),
            fetch_timeout_secs: GIT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl GitConfig {
    #[must_use]
    pub const fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }

    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// How template declarations are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Format of `.ironman.*` declaration files
    pub format: Decoder,
    /// Glob patterns of generator folders to skip
    pub ignore: Vec<String>,
}

impl Config {
    /// Load `<home>/config.toml`, falling back to defaults when it is absent.
    ///
    /// # Errors
    ///
    /// [`IronmanError::ConfigError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(home: &Path) -> Result<Self> {
        let path = Self::path(home);
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| IronmanError::ConfigError {
            file: path.display().to_string(),
            reason: e.message().to_string(),
        })?;

        if config.git.clone_timeout_secs == 0 || config.git.fetch_timeout_secs == 0 {
            return Err(IronmanError::ConfigError {
                file: path.display().to_string(),
                reason: "git timeouts must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(config)
    }

    /// Location of the configuration file for `home`.
    #[must_use]
    pub fn path(home: &Path) -> PathBuf {
        home.join(CONFIG_FILE_NAME)
    }
}

/// Resolve the ironman home: `flag`, then `IRONMAN_HOME`, then `~/.ironman`.
///
/// # Errors
///
/// Fails when the path cannot be expanded or no user home directory exists.
pub fn resolve_home(flag: Option<&str>) -> Result<PathBuf> {
    if let Some(home) = flag {
        return resolve_path(home);
    }

    if let Ok(home) = std::env::var(HOME_ENV_VAR)
        && !home.is_empty()
    {
        return resolve_path(&home);
    }

    default_home()
}

/// `~/.ironman` for the current user.
pub fn default_home() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_HOME_DIRECTORY))
        .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))
}
