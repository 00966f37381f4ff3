//! Template folder fixtures

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::GENERATORS_PATH;
use crate::model::GeneratorType;

/// One generator folder of a [`TemplateFixture`].
#[derive(Clone, Debug)]
pub struct GeneratorFixture {
    pub directory_name: String,
    pub name: String,
    pub ttype: GeneratorType,
    pub relative_path: Option<String>,
    pub files: Vec<(String, String)>,
}

impl GeneratorFixture {
    /// A directory generator with no files.
    pub fn directory(directory_name: &str) -> Self {
        Self {
            directory_name: directory_name.to_string(),
            name: directory_name.to_string(),
            ttype: GeneratorType::Directory,
            relative_path: None,
            files: Vec::new(),
        }
    }

    /// A file generator writing under `relative_path` next to the target.
    pub fn file(directory_name: &str, relative_path: &str) -> Self {
        Self {
            ttype: GeneratorType::File,
            relative_path: Some(relative_path.to_string()),
            ..Self::directory(directory_name)
        }
    }

    /// Add a file, `path` relative to the generator folder.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.to_string()));
        self
    }

    fn declaration(&self) -> String {
        let mut yaml = format!("name: {}\ntype: {}\n", self.name, self.ttype);
        if let Some(relative_path) = &self.relative_path {
            yaml.push_str(&format!("file_type_options:\n  file_generation_relative_path: \"{relative_path}\"\n"));
        }
        yaml
    }

    /// Write the generator folder under `generators`.
    pub fn write_to(&self, generators: &Path) -> Result<()> {
        let dir = generators.join(&self.directory_name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(".ironman.yaml"), self.declaration())?;
        for (path, content) in &self.files {
            let file = dir.join(path);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&file, content).with_context(|| format!("Failed to write {}", file.display()))?;
        }
        Ok(())
    }
}

/// A template folder with YAML declarations.
///
/// The default fixture has one directory generator, `app`, rendering
/// `README.md` from `values.name`.
#[derive(Clone, Debug)]
pub struct TemplateFixture {
    pub id: String,
    pub version: Option<String>,
    pub name: String,
    pub generators: Vec<GeneratorFixture>,
}

impl TemplateFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            version: None,
            name: format!("{id} template"),
            generators: vec![GeneratorFixture::directory("app").with_file("README.md", "# {{ values.name }}\n")],
        }
    }

    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    #[must_use]
    pub fn without_generators(mut self) -> Self {
        self.generators.clear();
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: GeneratorFixture) -> Self {
        self.generators.push(generator);
        self
    }

    /// Write the template to `parent/<id>` and return that path.
    pub fn write_to(&self, parent: &Path) -> Result<PathBuf> {
        let root = parent.join(&self.id);
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create fixture {}", root.display()))?;

        let mut yaml = format!("id: {}\nname: {}\n", self.id, self.name);
        if let Some(version) = &self.version {
            yaml.push_str(&format!("version: \"{version}\"\n"));
        }
        fs::write(root.join(".ironman.yaml"), yaml)?;

        let generators = root.join(GENERATORS_PATH);
        fs::create_dir_all(&generators)?;
        for generator in &self.generators {
            generator.write_to(&generators)?;
        }
        Ok(root)
    }
}
