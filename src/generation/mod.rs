//! Generating files and directories from a generator.
//!
//! Generation happens in two phases:
//!
//! 1. [`prepare_target`] checks the generation path against the generator type
//!    and the conflict policy. It fails before anything is written, except for
//!    directory generators where it creates the (empty) target directory.
//! 2. [`Generation::run`] walks the generator source tree and renders every file
//!    (and every templated path component) into the target.
//!
//! # Generator types
//!
//! - `directory`: the whole generator tree is reproduced under the target path.
//!   An existing target must be empty unless `force` is set.
//! - `file`: the generator holds exactly one template file. It is rendered to
//!   `parent(target) / file_generation_relative_path / file_name(target)`; the
//!   parent must exist, the relative subdirectories are created on demand.
//!
//! The first failure aborts the run. Output written before the failure is left
//! in place.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::constants::{DEFAULT_IGNORED_ENTRIES, METADATA_FILE_STEM};
use crate::core::IronmanError;
use crate::model::{Generator, GeneratorType, Template, Values};
use crate::templating::{RenderContext, TemplateError, TemplateRenderer, contains_template_syntax};
use crate::utils::fs::is_dir_empty;
use crate::utils::platform::absolute_path;

/// Where generated output goes, as decided by [`prepare_target`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Render the single template file to this path
    File(PathBuf),
    /// Reproduce the generator tree under this directory
    Directory(PathBuf),
}

impl Target {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }
}

/// Apply the conflict policy for `generator` at `generation_path`.
///
/// Relative paths are resolved against the current directory.
///
/// # Errors
///
/// - [`IronmanError::InvalidTarget`] when the parent directory does not exist
/// - [`IronmanError::FileAlreadyExists`] / [`IronmanError::TargetNotEmpty`]
///   when output exists and `force` is false
/// - [`IronmanError::PermissionDenied`] when the target directory cannot be created
pub fn prepare_target(generator: &Generator, generation_path: &Path, force: bool) -> Result<Target> {
    let target = absolute_path(generation_path)?;

    match generator.ttype {
        GeneratorType::File => prepare_file_target(generator, &target, force),
        GeneratorType::Directory => prepare_directory_target(&target, force),
    }
}

fn prepare_file_target(generator: &Generator, target: &Path, force: bool) -> Result<Target> {
    let (Some(parent), Some(file_name)) = (target.parent(), target.file_name()) else {
        return Err(invalid_target(target, "a file generator needs a path with a file name"));
    };

    if !parent.is_dir() {
        return Err(invalid_target(target, format!("directory {} does not exist", parent.display())));
    }

    let relative = generator.file_generation_relative_path();
    ensure_relative(&relative, target)?;

    let output = parent.join(relative).join(file_name);
    if output.is_dir() {
        return Err(invalid_target(&output, "a directory exists at the output path"));
    }
    if output.exists() && !force {
        return Err(IronmanError::FileAlreadyExists {
            path: output.display().to_string(),
        }
        .into());
    }

    Ok(Target::File(output))
}

fn prepare_directory_target(target: &Path, force: bool) -> Result<Target> {
    match std::fs::create_dir(target) {
        Ok(()) => {
            debug!("Created generation directory {}", target.display());
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            if !target.is_dir() {
                return Err(invalid_target(target, "a file exists at the generation path"));
            }
            let empty = is_dir_empty(target).map_err(|e| IronmanError::from_io("read", target, &e))?;
            if !empty && !force {
                return Err(IronmanError::TargetNotEmpty {
                    path: target.display().to_string(),
                }
                .into());
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let parent = target.parent().unwrap_or(target);
            return Err(invalid_target(target, format!("directory {} does not exist", parent.display())));
        }
        Err(e) => return Err(IronmanError::from_io("create generation directory", target, &e).into()),
    }

    Ok(Target::Directory(target.to_path_buf()))
}

fn ensure_relative(relative: &Path, target: &Path) -> Result<()> {
    if relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        Ok(())
    } else {
        Err(invalid_target(
            target,
            format!("file generation path {} must stay below the target's directory", relative.display()),
        ))
    }
}

fn invalid_target(path: &Path, reason: impl Into<String>) -> anyhow::Error {
    IronmanError::InvalidTarget {
        path: path.display().to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Whether `name` is a template or generator declaration file.
#[must_use]
pub fn is_metadata_file(name: &str) -> bool {
    Path::new(name).file_stem().is_some_and(|stem| stem == METADATA_FILE_STEM)
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| DEFAULT_IGNORED_ENTRIES.contains(&name))
}

/// One render of a generator into a prepared [`Target`].
pub struct Generation<'a> {
    template: &'a Template,
    generator: &'a Generator,
    source: PathBuf,
    values: &'a Values,
}

/// What a run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Written files, in walk order
    pub files: Vec<PathBuf>,
}

impl<'a> Generation<'a> {
    /// Render `generator` from its source tree at `source`.
    pub fn new(template: &'a Template, generator: &'a Generator, source: impl Into<PathBuf>, values: &'a Values) -> Self {
        Self {
            template,
            generator,
            source: source.into(),
            values,
        }
    }

    /// Render into `target`.
    ///
    /// # Errors
    ///
    /// - [`IronmanError::PathNotFound`] when the generator source is missing
    /// - [`IronmanError::InvalidTarget`] when a file generator does not hold
    ///   exactly one template file
    /// - [`IronmanError::RenderFailed`] for template errors
    pub async fn run(&self, target: &Target) -> Result<GenerationReport> {
        if !self.source.is_dir() {
            return Err(IronmanError::PathNotFound {
                path: self.source.display().to_string(),
            }
            .into());
        }

        let renderer =
            TemplateRenderer::new(RenderContext::new(self.template, self.generator, self.values).build()?);
        let entries = self.collect_entries()?;

        let report = match target {
            Target::File(output) => self.render_file(&renderer, &entries, output).await?,
            Target::Directory(root) => self.render_directory(&renderer, &entries, root).await?,
        };

        info!(
            "Generated {} file(s) from {}:{} into {}",
            report.files.len(),
            self.template.id,
            self.generator.id,
            target.path().display()
        );
        Ok(report)
    }

    /// Sorted entries below the source, relative to it. Metadata files, ignored
    /// entries and symlinks are dropped.
    fn collect_entries(&self) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.source)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry));

        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to walk generator directory {}", self.source.display()))?;

            if entry.file_type().is_symlink() {
                warn!("Skipping symlink {} in generator '{}'", entry.path().display(), self.generator.id);
                continue;
            }
            if entry.depth() == 1
                && entry.file_type().is_file()
                && entry.file_name().to_str().is_some_and(is_metadata_file)
            {
                continue;
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    async fn render_file(
        &self,
        renderer: &TemplateRenderer,
        entries: &[DirEntry],
        output: &Path,
    ) -> Result<GenerationReport> {
        let files: Vec<&DirEntry> = entries.iter().filter(|entry| entry.file_type().is_file()).collect();
        let [source] = files.as_slice() else {
            return Err(invalid_target(
                output,
                format!(
                    "file generator '{}' must contain exactly one template file, found {}",
                    self.generator.id,
                    files.len()
                ),
            ));
        };

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| IronmanError::from_io("create directory", parent, &e))?;
        }

        self.render_entry(renderer, source, output).await?;
        Ok(GenerationReport {
            files: vec![output.to_path_buf()],
        })
    }

    async fn render_directory(
        &self,
        renderer: &TemplateRenderer,
        entries: &[DirEntry],
        root: &Path,
    ) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        for entry in entries {
            let relative = entry.path().strip_prefix(&self.source).with_context(|| {
                format!("{} is outside generator directory {}", entry.path().display(), self.source.display())
            })?;
            let output = root.join(self.render_relative_path(renderer, relative, root)?);

            if entry.file_type().is_dir() {
                tokio::fs::create_dir_all(&output)
                    .await
                    .map_err(|e| IronmanError::from_io("create directory", &output, &e))?;
                continue;
            }

            if let Some(parent) = output.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| IronmanError::from_io("create directory", parent, &e))?;
            }
            self.render_entry(renderer, entry, &output).await?;
            report.files.push(output);
        }

        Ok(report)
    }

    /// Render each templated component of `relative`.
    fn render_relative_path(&self, renderer: &TemplateRenderer, relative: &Path, root: &Path) -> Result<PathBuf> {
        let mut rendered = PathBuf::new();

        for component in relative.components() {
            let Component::Normal(name) = component else {
                return Err(invalid_target(root, format!("unexpected path component in {}", relative.display())));
            };
            // Names that are not UTF-8 cannot hold template syntax and keep their bytes
            let Some(name) = name.to_str().filter(|text| contains_template_syntax(text)) else {
                rendered.push(name);
                continue;
            };

            let value = renderer
                .render(name, Some(relative))
                .map_err(TemplateError::into_ironman_error)?;
            let value = value.trim();
            if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
                return Err(IronmanError::RenderFailed {
                    file: relative.display().to_string(),
                    reason: format!("path component '{name}' rendered to invalid name '{value}'"),
                }
                .into());
            }
            rendered.push(value);
        }

        Ok(rendered)
    }

    /// Render one source file to `output`, keeping its permissions. Files that
    /// are not UTF-8 are copied byte for byte.
    async fn render_entry(&self, renderer: &TemplateRenderer, entry: &DirEntry, output: &Path) -> Result<()> {
        let source = entry.path();
        let relative = source.strip_prefix(&self.source).unwrap_or(source);

        let bytes = tokio::fs::read(source).await.map_err(|e| IronmanError::from_io("read", source, &e))?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => renderer
                .render(&text, Some(relative))
                .map_err(TemplateError::into_ironman_error)?
                .into_bytes(),
            Err(e) => {
                debug!("Copying binary file {}", relative.display());
                e.into_bytes()
            }
        };

        tokio::fs::write(output, content).await.map_err(|e| IronmanError::from_io("write", output, &e))?;

        let permissions = entry
            .metadata()
            .with_context(|| format!("Failed to read metadata of {}", source.display()))?
            .permissions();
        tokio::fs::set_permissions(output, permissions)
            .await
            .map_err(|e| IronmanError::from_io("set permissions", output, &e))?;

        debug!("Generated {}", output.display());
        Ok(())
    }
}
