//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Directory helpers, atomic writes and JSON file I/O
//! - [`platform`] - Platform-specific helpers and path resolution
//! - [`progress`] - Spinners for long-running operations
//!
//! # Example
//!
//! ```rust,no_run
//! use ironman::utils::{atomic_write, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("output/templates"))?;
//! atomic_write(Path::new("output/templates.index"), b"{}")?;
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, ensure_parent_dir, is_dir_empty, remove_dir_all};
pub use platform::{get_git_command, is_windows, resolve_path};
pub use progress::ProgressBar;
