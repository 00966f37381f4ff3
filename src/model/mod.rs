//! In-memory model of templates and their generators.
//!
//! A [`Template`] is what the index stores and what generation reads. It is
//! built by a [`reader::ModelReader`] from the declaration files inside the
//! template directory:
//!
//! ```text
//! my-template/
//! ├── .ironman.yaml              # id, version, name, description
//! └── generators/
//!     ├── app/
//!     │   ├── .ironman.yaml      # name, description, type: directory
//!     │   └── README.md          # rendered into the target directory
//!     └── controller/
//!         ├── .ironman.yaml      # type: file, file_type_options
//!         └── controller.rs      # rendered into a single file
//! ```

pub mod reader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub use reader::{Decoder, FsModelReader, ModelReader};

/// Values supplied at generation time, exposed to templates as `values`.
pub type Values = BTreeMap<String, serde_json::Value>;

/// How a template got into the templates directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Fetched from a remote locator
    #[default]
    Url,
    /// Symlinked from a local path
    Link,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => write!(f, "url"),
            Self::Link => write!(f, "link"),
        }
    }
}

/// What a generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    /// A single file placed next to (or below) the target's parent
    File,
    /// A whole directory tree at the target path
    #[default]
    Directory,
}

impl fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Options that only apply to [`GeneratorType::File`] generators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileTypeOptions {
    /// Output subdirectory, relative to the parent of the generation path.
    #[serde(default)]
    pub file_generation_relative_path: PathBuf,
}

/// A named generator inside a template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Generator {
    /// Defaults to `directory_name` when the declaration omits it.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub ttype: GeneratorType,
    /// Folder of this generator under the template's `generators/` directory.
    #[serde(default)]
    pub directory_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type_options: Option<FileTypeOptions>,
}

impl Generator {
    /// Relative output directory for file generators; empty for directory generators.
    #[must_use]
    pub fn file_generation_relative_path(&self) -> PathBuf {
        self.file_type_options
            .as_ref()
            .map(|options| options.file_generation_relative_path.clone())
            .unwrap_or_default()
    }
}

/// An installed or linked template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Folder (or symlink) name under the templates directory.
    #[serde(default)]
    pub directory_name: String,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub generators: Vec<Generator>,
}

impl Template {
    /// Look up a generator by ID. The first match wins.
    #[must_use]
    pub fn generator(&self, id: &str) -> Option<&Generator> {
        self.generators.iter().find(|generator| generator.id == id)
    }

    /// IDs of all generators, in declaration order.
    pub fn generator_ids(&self) -> impl Iterator<Item = &str> {
        self.generators.iter().map(|generator| generator.id.as_str())
    }
}
