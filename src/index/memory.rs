//! In-memory [`TemplateIndex`].

use anyhow::Result;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::TemplateIndex;
use crate::core::IronmanError;
use crate::model::Template;

/// Index kept in a concurrent map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    templates: DashMap<String, Template>,
}

impl MemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateIndex for MemoryIndex {
    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.templates.contains_key(id))
    }

    fn find_template_by_id(&self, id: &str) -> Result<Template> {
        self.templates.get(id).map(|entry| entry.value().clone()).ok_or_else(|| {
            IronmanError::TemplateNotInstalled {
                id: id.to_string(),
            }
            .into()
        })
    }

    fn index(&self, template: &Template) -> Result<String> {
        match self.templates.entry(template.id.clone()) {
            Entry::Occupied(_) => Err(IronmanError::TemplateAlreadyInstalled {
                id: template.id.clone(),
            }
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(template.clone());
                Ok(template.id.clone())
            }
        }
    }

    fn update(&self, template: &Template) -> Result<()> {
        let Some(mut entry) = self.templates.get_mut(&template.id) else {
            return Err(IronmanError::TemplateNotInstalled {
                id: template.id.clone(),
            }
            .into());
        };
        *entry = template.clone();
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<String> {
        self.templates.remove(id).map(|(id, _)| id).ok_or_else(|| {
            IronmanError::TemplateNotInstalled {
                id: id.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> Result<Vec<Template>> {
        Ok(self.templates.iter().map(|entry| entry.value().clone()).collect())
    }
}
