//! Test utilities for Ironman
//!
//! Helpers shared by the unit tests and the integration suite:
//! - [`TemplateFixture`] writes template folders with declarations
//! - [`CopyManager`] installs templates from local folders without git
//! - [`TestGit`] drives the system git for repository fixtures
//!
//! # Example
//!
//! ```rust,no_run
//! use ironman::test_utils::{TemplateFixture, TestGit};
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let source = TemplateFixture::new("base").write_to(temp.path()).unwrap();
//!
//! let git = TestGit::new(&source);
//! git.init().unwrap();
//! git.config_user().unwrap();
//! git.add_all().unwrap();
//! git.commit("Initial template").unwrap();
//! ```

pub mod fixtures;
pub mod git_helper;
pub mod manager;

pub use fixtures::{GeneratorFixture, TemplateFixture};
pub use git_helper::TestGit;
pub use manager::CopyManager;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`. With neither, tests run
/// silently.
///
/// ```bash
/// RUST_LOG=ironman=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
