//! The template index: the source of truth for "what is installed".
//!
//! [`TemplateIndex`] maps template IDs to their [`Template`] model. Two adapters
//! are provided:
//!
//! - [`FileIndex`] - a JSON document under the ironman home, rewritten
//!   atomically on every mutation and re-read on every call
//! - [`MemoryIndex`] - a concurrent in-memory map, useful for embedding and tests
//!
//! Neither adapter locks against other processes; the index is single-writer.

mod file;
mod memory;

pub use file::FileIndex;
pub use memory::MemoryIndex;

use anyhow::Result;

use crate::model::Template;

/// Persistent mapping from template ID to [`Template`].
pub trait TemplateIndex: Send + Sync {
    /// Whether `id` is indexed. Absence is not an error.
    fn exists(&self, id: &str) -> Result<bool>;

    /// # Errors
    ///
    /// [`crate::core::IronmanError::TemplateNotInstalled`] when `id` is absent.
    fn find_template_by_id(&self, id: &str) -> Result<Template>;

    /// Insert `template`, returning its ID.
    ///
    /// # Errors
    ///
    /// [`crate::core::IronmanError::TemplateAlreadyInstalled`] when the ID is taken.
    fn index(&self, template: &Template) -> Result<String>;

    /// Replace the stored model for `template.id`.
    ///
    /// # Errors
    ///
    /// [`crate::core::IronmanError::TemplateNotInstalled`] when absent.
    fn update(&self, template: &Template) -> Result<()>;

    /// Remove `id`, returning it.
    ///
    /// # Errors
    ///
    /// [`crate::core::IronmanError::TemplateNotInstalled`] when absent.
    fn delete(&self, id: &str) -> Result<String>;

    /// Every indexed template, in no particular order.
    fn list(&self) -> Result<Vec<Template>>;
}
