//! Reading template declarations from disk.
//!
//! [`FsModelReader`] walks a template directory, decodes the root declaration
//! and one declaration per generator folder under `generators/`, and assembles
//! a [`Template`]. Generators are ordered by folder name so lookups by ID are
//! deterministic.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{Generator, Template};
use crate::constants::{DEFAULT_IGNORED_ENTRIES, GENERATORS_PATH, METADATA_FILE_STEM};
use crate::core::IronmanError;

/// Reads a template rooted at a directory into a [`Template`].
pub trait ModelReader: Send + Sync {
    /// # Errors
    ///
    /// Returns [`IronmanError::PathNotFound`] when `root` does not exist and
    /// [`IronmanError::MetadataParseError`] when a declaration is missing or malformed.
    fn read(&self, root: &Path) -> Result<Template>;
}

/// Format of the declaration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoder {
    #[default]
    Yaml,
    Json,
}

impl Decoder {
    /// File extension of declaration files in this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    /// Name of the declaration file, e.g. `.ironman.yaml`.
    #[must_use]
    pub fn metadata_file_name(self) -> String {
        format!("{METADATA_FILE_STEM}.{}", self.extension())
    }

    fn decode<T: DeserializeOwned>(self, content: &str, file: &Path) -> Result<T> {
        let decoded = match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };

        decoded.map_err(|reason| {
            IronmanError::MetadataParseError {
                file: file.display().to_string(),
                reason,
            }
            .into()
        })
    }
}

/// Filesystem-backed [`ModelReader`].
#[derive(Debug, Clone)]
pub struct FsModelReader {
    ignore: Vec<glob::Pattern>,
    decoder: Decoder,
    generators_path: String,
}

impl Default for FsModelReader {
    fn default() -> Self {
        Self::new(Decoder::default())
    }
}

impl FsModelReader {
    /// Reader using `decoder`, the standard `generators/` folder and the
    /// default ignore list.
    #[must_use]
    pub fn new(decoder: Decoder) -> Self {
        let ignore = DEFAULT_IGNORED_ENTRIES
            .iter()
            .filter_map(|pattern| glob::Pattern::new(pattern).ok())
            .collect();

        Self {
            ignore,
            decoder,
            generators_path: GENERATORS_PATH.to_string(),
        }
    }

    /// Also skip generator folders whose name matches `pattern`.
    ///
    /// # Errors
    ///
    /// Fails when `pattern` is not a valid glob.
    pub fn with_ignore(mut self, pattern: &str) -> Result<Self> {
        let pattern = glob::Pattern::new(pattern)
            .with_context(|| format!("Invalid ignore pattern: {pattern}"))?;
        self.ignore.push(pattern);
        Ok(self)
    }

    /// The decoder used for declaration files.
    #[must_use]
    pub const fn decoder(&self) -> Decoder {
        self.decoder
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|pattern| pattern.matches(name))
    }

    fn read_declaration<T: DeserializeOwned>(&self, dir: &Path) -> Result<T> {
        let file = dir.join(self.decoder.metadata_file_name());
        let content = fs::read_to_string(&file).map_err(|e| IronmanError::MetadataParseError {
            file: file.display().to_string(),
            reason: e.to_string(),
        })?;
        self.decoder.decode(&content, &file)
    }

    fn read_generators(&self, root: &Path) -> Result<Vec<Generator>> {
        let generators_dir = root.join(&self.generators_path);
        if !generators_dir.is_dir() {
            debug!("No generators directory in {}", root.display());
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&generators_dir)
            .with_context(|| format!("Failed to read {}", generators_dir.display()))?
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read {}", generators_dir.display()))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut generators = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.file_name().to_string_lossy().to_string();
            if self.is_ignored(&name) || !entry.path().is_dir() {
                continue;
            }

            let mut generator: Generator = self.read_declaration(&entry.path())?;
            generator.directory_name.clone_from(&name);
            if generator.id.is_empty() {
                generator.id = name;
            }
            debug!("Read generator '{}' ({})", generator.id, generator.ttype);
            generators.push(generator);
        }

        Ok(generators)
    }
}

impl ModelReader for FsModelReader {
    fn read(&self, root: &Path) -> Result<Template> {
        if !root.exists() {
            return Err(IronmanError::PathNotFound {
                path: root.display().to_string(),
            }
            .into());
        }

        let mut template: Template = self.read_declaration(root)?;
        template.directory_name = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        template.generators = self.read_generators(root)?;

        debug!(
            "Read template '{}' with {} generator(s) from {}",
            template.id,
            template.generators.len(),
            root.display()
        );
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorKind, error_kind};
    use crate::model::GeneratorType;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_template() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, ".ironman.yaml", "id: base\nversion: 1.0.0\nname: Base\n");
        write(root, "generators/zeta/.ironman.yaml", "name: Zeta\ntype: directory\n");
        write(
            root,
            "generators/alpha/.ironman.yaml",
            "id: controller\ntype: file\nfile_type_options:\n  file_generation_relative_path: src\n",
        );
        write(root, "generators/alpha/controller.rs", "// {{ values.name }}\n");
        write(root, "generators/.git/config", "");
        temp
    }

    #[test]
    fn test_read_template() {
        let temp = sample_template();
        let template = FsModelReader::default().read(temp.path()).unwrap();

        assert_eq!(template.id, "base");
        assert_eq!(template.version.as_deref(), Some("1.0.0"));
        assert_eq!(
            template.directory_name,
            temp.path().file_name().unwrap().to_string_lossy()
        );
        assert_eq!(template.generator_ids().collect::<Vec<_>>(), vec!["controller", "zeta"]);

        let controller = template.generator("controller").unwrap();
        assert_eq!(controller.ttype, GeneratorType::File);
        assert_eq!(controller.directory_name, "alpha");
        assert_eq!(controller.file_generation_relative_path(), PathBuf::from("src"));

        let zeta = template.generator("zeta").unwrap();
        assert_eq!(zeta.directory_name, "zeta");
        assert_eq!(zeta.ttype, GeneratorType::Directory);
    }

    #[test]
    fn test_read_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = FsModelReader::default().read(&temp.path().join("missing")).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));
    }

    #[test]
    fn test_read_malformed_metadata() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".ironman.yaml", "id: [unterminated\n");

        let err = FsModelReader::default().read(temp.path()).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::InvalidMetadata));
        assert!(err.to_string().contains(".ironman.yaml"));
    }

    #[test]
    fn test_read_missing_generator_declaration() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".ironman.yaml", "id: base\n");
        write(temp.path(), "generators/app/README.md", "hello");

        let err = FsModelReader::default().read(temp.path()).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::InvalidMetadata));
    }

    #[test]
    fn test_read_json_decoder() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".ironman.json", r#"{"id": "json-template"}"#);
        write(temp.path(), "generators/app/.ironman.json", r#"{"type": "directory"}"#);

        let template = FsModelReader::new(Decoder::Json).read(temp.path()).unwrap();
        assert_eq!(template.id, "json-template");
        assert_eq!(template.generator_ids().collect::<Vec<_>>(), vec!["app"]);
    }

    #[test]
    fn test_custom_ignore_pattern() {
        let temp = sample_template();
        let reader = FsModelReader::default().with_ignore("zet*").unwrap();
        let template = reader.read(temp.path()).unwrap();
        assert_eq!(template.generator_ids().collect::<Vec<_>>(), vec!["controller"]);
    }
}
