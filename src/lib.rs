//! Ironman - project templates and code generators
//!
//! Ironman installs *templates* (git repositories or local folders) into a
//! home directory, keeps an index of them, and renders their *generators*
//! into new files and directories with [Tera](https://keats.github.io/tera/).
//!
//! # Architecture Overview
//!
//! The [`Ironman`] orchestrator wires four ports together:
//!
//! - [`manager::SourceManager`] - materializes templates on disk (git clone, symlink)
//! - [`index::TemplateIndex`] - persistent map of template ID to [`model::Template`]
//! - [`model::ModelReader`] - reads template declarations (`.ironman.yaml`)
//! - [`validator::Validator`] - checks a template before it is indexed
//!
//! Install and link are transactional: if reading, validating or indexing
//! fails after the template was materialized, the template is removed again.
//!
//! # Core Modules
//!
//! - [`cli`] - clap front end
//! - [`config`] - home resolution and `config.toml`
//! - [`core`] - [`core::IronmanError`] and the user facing error rendering
//! - [`generation`] - target preparation and rendering of generator trees
//! - [`git`] - `git` subprocess wrapper
//! - [`index`] - file and in-memory indexes
//! - [`manager`] - git backed source manager
//! - [`model`] - templates, generators and their readers
//! - [`templating`] - Tera rendering with helpful errors
//! - [`validator`] - metadata validation
//! - [`utils`] - filesystem, platform and progress helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use ironman::Ironman;
//! use ironman::model::Values;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let ironman = Ironman::new("/home/me/.ironman")?;
//! ironman.ensure_home()?;
//! ironman.install("https://github.com/example/rust-service.git").await?;
//!
//! let mut values = Values::new();
//! values.insert("name".to_string(), "billing".into());
//! ironman.generate("rust-service", "app", Path::new("./billing"), &values, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod generation;
pub mod git;
pub mod index;
pub mod ironman;
pub mod manager;
pub mod model;
pub mod templating;
pub mod utils;
pub mod validator;

pub use ironman::{Ironman, IronmanBuilder};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
