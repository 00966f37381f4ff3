//! JSON-file backed [`TemplateIndex`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::TemplateIndex;
use crate::core::IronmanError;
use crate::model::Template;
use crate::utils::fs::{read_json_file, write_json_file};

const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexDocument {
    version: u32,
    #[serde(default)]
    templates: BTreeMap<String, Template>,
}

/// Index persisted as a single JSON document.
///
/// Every call reads the document from disk and every mutation writes it back
/// atomically before returning, so there is no cache to go stale.
#[derive(Debug, Clone)]
pub struct FileIndex {
    path: PathBuf,
}

impl FileIndex {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IndexDocument> {
        if !self.path.exists() {
            return Ok(IndexDocument {
                version: INDEX_FORMAT_VERSION,
                templates: BTreeMap::new(),
            });
        }

        let document: IndexDocument = read_json_file(&self.path)
            .with_context(|| format!("Failed to load template index {}", self.path.display()))?;

        if document.version > INDEX_FORMAT_VERSION {
            return Err(anyhow::anyhow!(
                "Template index {} has format version {}, but this ironman only understands version {}",
                self.path.display(),
                document.version,
                INDEX_FORMAT_VERSION
            ));
        }
        Ok(document)
    }

    fn save(&self, document: &IndexDocument) -> Result<()> {
        write_json_file(&self.path, document)
            .with_context(|| format!("Failed to save template index {}", self.path.display()))?;
        debug!("Saved {} template(s) to {}", document.templates.len(), self.path.display());
        Ok(())
    }
}

impl TemplateIndex for FileIndex {
    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.load()?.templates.contains_key(id))
    }

    fn find_template_by_id(&self, id: &str) -> Result<Template> {
        self.load()?.templates.remove(id).ok_or_else(|| {
            IronmanError::TemplateNotInstalled {
                id: id.to_string(),
            }
            .into()
        })
    }

    fn index(&self, template: &Template) -> Result<String> {
        let mut document = self.load()?;
        if document.templates.contains_key(&template.id) {
            return Err(IronmanError::TemplateAlreadyInstalled {
                id: template.id.clone(),
            }
            .into());
        }

        document.templates.insert(template.id.clone(), template.clone());
        self.save(&document)?;
        Ok(template.id.clone())
    }

    fn update(&self, template: &Template) -> Result<()> {
        let mut document = self.load()?;
        let Some(entry) = document.templates.get_mut(&template.id) else {
            return Err(IronmanError::TemplateNotInstalled {
                id: template.id.clone(),
            }
            .into());
        };

        *entry = template.clone();
        self.save(&document)
    }

    fn delete(&self, id: &str) -> Result<String> {
        let mut document = self.load()?;
        if document.templates.remove(id).is_none() {
            return Err(IronmanError::TemplateNotInstalled {
                id: id.to_string(),
            }
            .into());
        }

        self.save(&document)?;
        Ok(id.to_string())
    }

    fn list(&self) -> Result<Vec<Template>> {
        Ok(self.load()?.templates.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_index_contract() {
        let temp = TempDir::new().unwrap();
        let index = FileIndex::new(temp.path().join("templates.index"));
        crate::index::contract::check(&index);
    }

    #[test]
    fn test_mutations_are_visible_to_a_fresh_instance() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("templates.index");

        FileIndex::new(&path)
            .index(&Template {
                id: "base".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert!(path.exists());
        assert!(FileIndex::new(&path).exists("base").unwrap());
    }

    #[test]
    fn test_missing_file_is_empty_index() {
        let temp = TempDir::new().unwrap();
        let index = FileIndex::new(temp.path().join("nested").join("templates.index"));
        assert!(index.list().unwrap().is_empty());
        assert!(!index.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("templates.index");
        std::fs::write(&path, "not json").unwrap();

        let err = FileIndex::new(&path).exists("base").unwrap_err();
        assert!(err.to_string().contains("Failed to load template index"));
    }

    #[test]
    fn test_newer_format_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("templates.index");
        std::fs::write(&path, r#"{"version": 99, "templates": {}}"#).unwrap();

        assert!(FileIndex::new(&path).list().is_err());
    }
}
