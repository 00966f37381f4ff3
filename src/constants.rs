//! Global constants used throughout the Ironman codebase.
//!
//! File and directory names that make up the on-disk layout of the ironman
//! home, plus the default timeouts applied to git subprocesses.

use std::time::Duration;

/// Name of the index file stored directly under the ironman home.
pub const INDEX_NAME: &str = "templates.index";

/// Directory under the ironman home holding one entry per installed or linked template.
pub const TEMPLATES_DIRECTORY: &str = "templates";

/// Directory inside a template that holds its generators.
pub const GENERATORS_PATH: &str = "generators";

/// Base name (without extension) of template and generator declaration files.
pub const METADATA_FILE_STEM: &str = ".ironman";

/// Name of the optional configuration file under the ironman home.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the ironman home directory.
pub const HOME_ENV_VAR: &str = "IRONMAN_HOME";

/// Default home directory name, relative to the user's home.
pub const DEFAULT_HOME_DIRECTORY: &str = ".ironman";

/// Entries never read as metadata nor rendered during generation.
pub const DEFAULT_IGNORED_ENTRIES: &[&str] = &[".git"];

/// Suffix stripped from a locator when deriving the template directory name.
pub const GIT_SUFFIX: &str = ".git";

/// Timeout for cloning a template repository.
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for pulling updates into an installed template.
pub const GIT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);
