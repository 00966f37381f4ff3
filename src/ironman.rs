//! The lifecycle orchestrator.
//!
//! [`Ironman`] sequences the source manager, model reader, validators and
//! index for every template operation, and hands generation over to
//! [`crate::generation`]. It is the only place that mutates both the templates
//! directory and the index, so it owns the invariant that every indexed
//! template has a materialized directory or link.
//!
//! # Rollback
//!
//! `install` and `link` materialize files before they can read and validate
//! the metadata. A scoped `Rollback` guard is armed right after
//! materialization and disarmed once the index insert succeeds. On the error
//! path it runs explicitly so its own failure can be attached to the primary
//! error. `Drop` repeats the cleanup only when a panic unwinds past the guard,
//! since nothing between arming and disarming awaits. A future dropped while
//! the clone is still running is cleaned up by the git manager's own
//! partial-clone guard.
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
//!
//! let template = ironman.install("https://github.com/ironman-project/template-example.git").await?;
//! ironman.generate(&template.id, "app", Path::new("my-app"), &Values::new(), false).await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{GENERATORS_PATH, INDEX_NAME, TEMPLATES_DIRECTORY};
use crate::core::IronmanError;
use crate::generation::{Generation, GenerationReport, prepare_target};
use crate::index::{FileIndex, TemplateIndex};
use crate::manager::{GitManager, SourceManager, validate_template_id};
use crate::model::{Decoder, FsModelReader, ModelReader, SourceType, Template, Values};
use crate::utils::fs::{ensure_dir, is_dir_empty};
use crate::validator::{MetadataValidator, Validator, render_report};

/// Template lifecycle manager and generation entry point.
pub struct Ironman {
    home: PathBuf,
    decoder: Decoder,
    manager: Box<dyn SourceManager>,
    index: Box<dyn TemplateIndex>,
    model_reader: Box<dyn ModelReader>,
    validators: Vec<Box<dyn Validator>>,
}

impl std::fmt::Debug for Ironman {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ironman")
            .field("home", &self.home)
            .field("decoder", &self.decoder)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}

/// Builds an [`Ironman`], defaulting every collaborator to the concrete
/// adapter configured by `<home>/config.toml`.
pub struct IronmanBuilder {
    home: PathBuf,
    config: Option<Config>,
    manager: Option<Box<dyn SourceManager>>,
    index: Option<Box<dyn TemplateIndex>>,
    model_reader: Option<Box<dyn ModelReader>>,
    validators: Option<Vec<Box<dyn Validator>>>,
}

impl IronmanBuilder {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            config: None,
            manager: None,
            index: None,
            model_reader: None,
            validators: None,
        }
    }

    /// Use `config` instead of loading `<home>/config.toml`.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn manager(mut self, manager: impl SourceManager + 'static) -> Self {
        self.manager = Some(Box::new(manager));
        self
    }

    #[must_use]
    pub fn index(mut self, index: impl TemplateIndex + 'static) -> Self {
        self.index = Some(Box::new(index));
        self
    }

    #[must_use]
    pub fn model_reader(mut self, model_reader: impl ModelReader + 'static) -> Self {
        self.model_reader = Some(Box::new(model_reader));
        self
    }

    /// Replace the validator list. An empty list disables validation.
    #[must_use]
    pub fn validators(mut self, validators: Vec<Box<dyn Validator>>) -> Self {
        self.validators = Some(validators);
        self
    }

    /// # Errors
    ///
    /// Fails when the configuration file is invalid or an ignore pattern in
    /// it is not a valid glob.
    pub fn build(self) -> Result<Ironman> {
        let config = match self.config {
            Some(config) => config,
            None => Config::load(&self.home)?,
        };
        let decoder = config.metadata.format;

        let manager = match self.manager {
            Some(manager) => manager,
            None => Box::new(
                GitManager::new(self.home.join(TEMPLATES_DIRECTORY))
                    .with_timeouts(config.git.clone_timeout(), config.git.fetch_timeout()),
            ),
        };

        let index = match self.index {
            Some(index) => index,
            None => Box::new(FileIndex::new(self.home.join(INDEX_NAME))),
        };

        let model_reader = match self.model_reader {
            Some(reader) => reader,
            None => {
                let mut reader = FsModelReader::new(decoder);
                for pattern in &config.metadata.ignore {
                    reader = reader.with_ignore(pattern)?;
                }
                Box::new(reader)
            }
        };

        let validators = self.validators.unwrap_or_else(|| vec![Box::new(MetadataValidator)]);

        Ok(Ironman {
            home: self.home,
            decoder,
            manager,
            index,
            model_reader,
            validators,
        })
    }
}

/// What to undo when a freshly materialized template cannot be indexed.
#[derive(Debug, Clone, Copy)]
enum Compensation {
    Uninstall,
    Unlink,
}

/// Scoped compensation for a materialized but not yet indexed template.
struct Rollback<'a> {
    manager: &'a dyn SourceManager,
    directory_name: String,
    compensation: Compensation,
    armed: bool,
}

impl<'a> Rollback<'a> {
    fn arm(manager: &'a dyn SourceManager, directory_name: &str, compensation: Compensation) -> Self {
        Self {
            manager,
            directory_name: directory_name.to_string(),
            compensation,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }

    fn run(&mut self) -> Result<()> {
        self.armed = false;
        debug!("Rolling back {:?} of '{}'", self.compensation, self.directory_name);
        match self.compensation {
            Compensation::Uninstall => self.manager.uninstall(&self.directory_name),
            Compensation::Unlink => self.manager.unlink(&self.directory_name),
        }
    }

    /// Compensate and return `error`, annotated if compensation failed too.
    fn fail(mut self, error: anyhow::Error) -> anyhow::Error {
        match self.run() {
            Ok(()) => error,
            Err(cleanup) => error.context(format!(
                "Rollback of '{}' also failed, remove it manually: {cleanup:#}",
                self.directory_name
            )),
        }
    }
}

// Reached while still armed only when unwinding from a panic
impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = self.run()
        {
            warn!("Failed to roll back '{}': {:#}", self.directory_name, e);
        }
    }
}

impl Ironman {
    /// Orchestrator for `home` with the default adapters.
    pub fn new(home: impl Into<PathBuf>) -> Result<Self> {
        IronmanBuilder::new(home).build()
    }

    pub fn builder(home: impl Into<PathBuf>) -> IronmanBuilder {
        IronmanBuilder::new(home)
    }

    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Where the template with `directory_name` lives.
    #[must_use]
    pub fn template_location(&self, directory_name: &str) -> PathBuf {
        self.manager.template_location(directory_name)
    }

    /// Create the home and templates directories when missing.
    pub fn ensure_home(&self) -> Result<()> {
        ensure_dir(&self.home.join(TEMPLATES_DIRECTORY))
            .with_context(|| format!("Failed to initialize ironman home {}", self.home.display()))
    }

    /// Fetch, validate and index the template at `locator`.
    ///
    /// # Errors
    ///
    /// - [`IronmanError::LocationOccupied`] when the template directory exists
    /// - [`IronmanError::FetchFailed`] when the template cannot be fetched
    /// - [`IronmanError::ValidationFailed`] when a validator rejects the metadata
    /// - [`IronmanError::TemplateAlreadyInstalled`] when the declared ID is taken
    pub async fn install(&self, locator: &str) -> Result<Template> {
        let directory_name = self
            .manager
            .install(locator)
            .await
            .with_context(|| format!("Failed to install template from {locator}"))?;

        let rollback = Rollback::arm(self.manager.as_ref(), &directory_name, Compensation::Uninstall);
        match self.register(&directory_name, None, SourceType::Url) {
            Ok(template) => {
                rollback.disarm();
                info!("Installed template '{}' from {}", template.id, locator);
                Ok(template)
            }
            Err(e) => Err(rollback.fail(e)),
        }
    }

    /// Link the local template at `path` under `id`.
    ///
    /// The declared ID is replaced by `id`.
    pub fn link(&self, path: &Path, id: &str) -> Result<Template> {
        validate_template_id(id)?;
        if self.index.exists(id)? {
            return Err(IronmanError::TemplateAlreadyInstalled {
                id: id.to_string(),
            }
            .into());
        }

        self.manager.link(path, id)?;

        let rollback = Rollback::arm(self.manager.as_ref(), id, Compensation::Unlink);
        match self.register(id, Some(id), SourceType::Link) {
            Ok(template) => {
                rollback.disarm();
                info!("Linked template '{}' from {}", template.id, path.display());
                Ok(template)
            }
            Err(e) => Err(rollback.fail(e)),
        }
    }

    /// Remove an installed template's files, then its index entry.
    pub fn uninstall(&self, id: &str) -> Result<()> {
        let template = self.find_indexed(id)?;

        self.manager
            .uninstall(&template.directory_name)
            .with_context(|| format!("Failed to remove files of template '{id}'"))?;
        self.index.delete(id)?;

        info!("Uninstalled template '{id}'");
        Ok(())
    }

    /// Remove a linked template's symlink, then its index entry.
    pub fn unlink(&self, id: &str) -> Result<()> {
        let template = self.find_indexed(id)?;
        if template.source_type != SourceType::Link {
            return Err(IronmanError::NotALink {
                path: self.template_location(&template.directory_name).display().to_string(),
            }
            .into());
        }

        self.manager
            .unlink(&template.directory_name)
            .with_context(|| format!("Failed to unlink template '{id}'"))?;
        self.index.delete(id)?;

        info!("Unlinked template '{id}'");
        Ok(())
    }

    /// Refresh an installed template's files in place. The index is untouched.
    pub async fn update(&self, id: &str) -> Result<()> {
        let template = self.find_indexed(id)?;

        self.manager
            .update(&template.directory_name)
            .await
            .with_context(|| format!("Failed to update template '{id}'"))?;

        info!("Updated template '{id}'");
        Ok(())
    }

    /// Every indexed template, ordered by ID.
    pub fn list(&self) -> Result<Vec<Template>> {
        let mut templates = self.index.list()?;
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(templates)
    }

    /// Run `generator_id` of `template_id` into `generation_path`.
    ///
    /// Linked templates have their metadata re-read (and re-indexed) first.
    ///
    /// # Errors
    ///
    /// - [`IronmanError::TemplateNotInstalled`] / [`IronmanError::GeneratorNotFound`]
    /// - the conflict and render errors of [`crate::generation`]
    pub async fn generate(
        &self,
        template_id: &str,
        generator_id: &str,
        generation_path: &Path,
        values: &Values,
        force: bool,
    ) -> Result<GenerationReport> {
        let mut template = self.find_indexed(template_id)?;

        if template.source_type == SourceType::Link {
            template = self
                .refresh_link(&template)
                .with_context(|| format!("Failed to refresh metadata of linked template '{template_id}'"))?;
        }

        let Some(generator) = template.generator(generator_id) else {
            return Err(IronmanError::GeneratorNotFound {
                template: template_id.to_string(),
                generator: generator_id.to_string(),
                similar: closest_match(generator_id, template.generator_ids()),
            }
            .into());
        };

        let target = prepare_target(generator, generation_path, force)?;
        let source = self
            .manager
            .template_location(&template.directory_name)
            .join(GENERATORS_PATH)
            .join(&generator.directory_name);

        Generation::new(&template, generator, source, values).run(&target).await
    }

    /// Scaffold a new template at `path` and return its model.
    ///
    /// The template ID is the final path component.
    ///
    /// # Errors
    ///
    /// [`IronmanError::TargetNotEmpty`] when `path` exists and is not empty.
    pub fn create(&self, path: &Path) -> Result<Template> {
        let id = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_default();
        validate_template_id(&id)?;

        if path.exists() {
            let empty = is_dir_empty(path).map_err(|e| IronmanError::from_io("read", path, &e))?;
            if !empty {
                return Err(IronmanError::TargetNotEmpty {
                    path: path.display().to_string(),
                }
                .into());
            }
        }

        let generator_dir = path.join(GENERATORS_PATH).join("app");
        ensure_dir(&generator_dir)?;

        let metadata_file = self.decoder.metadata_file_name();
        let root = serde_json::json!({
            "id": id,
            "version": "0.1.0",
            "name": id,
            "description": format!("{id} template"),
        });
        let generator = serde_json::json!({
            "name": "app",
            "description": "Generates a new application directory",
            "type": "directory",
        });

        std::fs::write(path.join(&metadata_file), self.encode(&root)?)
            .map_err(|e| IronmanError::from_io("write", path, &e))?;
        std::fs::write(generator_dir.join(&metadata_file), self.encode(&generator)?)
            .map_err(|e| IronmanError::from_io("write", &generator_dir, &e))?;
        std::fs::write(
            generator_dir.join("README.md"),
            "# {{ values.name | default(value=\"app\") }}\n\nGenerated from {{ template.id }}:{{ generator.id }}.\n",
        )
        .map_err(|e| IronmanError::from_io("write", &generator_dir, &e))?;

        let template = self.model_reader.read(path)?;
        info!("Created template '{}' at {}", template.id, path.display());
        Ok(template)
    }

    fn encode(&self, value: &serde_json::Value) -> Result<String> {
        Ok(match self.decoder {
            Decoder::Yaml => serde_yaml::to_string(value)?,
            Decoder::Json => serde_json::to_string_pretty(value)? + "\n",
        })
    }

    fn find_indexed(&self, id: &str) -> Result<Template> {
        if !self.index.exists(id)? {
            return Err(IronmanError::TemplateNotInstalled {
                id: id.to_string(),
            }
            .into());
        }
        self.index.find_template_by_id(id)
    }

    /// Read, validate and index the template materialized at `directory_name`.
    fn register(&self, directory_name: &str, id: Option<&str>, source_type: SourceType) -> Result<Template> {
        let location = self.manager.template_location(directory_name);
        let mut template = self
            .model_reader
            .read(&location)
            .with_context(|| format!("Failed to read template metadata from {}", location.display()))?;

        if let Some(id) = id {
            template.id = id.to_string();
        }
        template.source_type = source_type;

        self.validate(&template)?;
        self.index.index(&template)?;
        Ok(template)
    }

    /// Run validators in order; the first failure aborts.
    fn validate(&self, template: &Template) -> Result<()> {
        for validator in &self.validators {
            let validation = validator.validate(template)?;
            if !validation.valid {
                let message = render_report(&validation.report)?;
                return Err(IronmanError::ValidationFailed {
                    id: template.id.clone(),
                    message,
                    report: validation.report,
                }
                .into());
            }
        }
        Ok(())
    }

    fn refresh_link(&self, indexed: &Template) -> Result<Template> {
        let location = self.manager.template_location(&indexed.directory_name);
        let mut template = self.model_reader.read(&location)?;

        template.id = indexed.id.clone();
        template.source_type = SourceType::Link;
        self.index.update(&template)?;

        debug!("Refreshed metadata of linked template '{}'", template.id);
        Ok(template)
    }
}

/// The candidate closest to `target`, if any is reasonably close.
fn closest_match<'a>(target: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let threshold = (target.len() / 3).max(2);
    candidates
        .map(|candidate| (strsim::levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorKind, error_kind, find_ironman_error};
    use crate::index::MemoryIndex;
    use crate::test_utils::{CopyManager, TemplateFixture};
    use tempfile::TempDir;

    struct Env {
        temp: TempDir,
        ironman: Ironman,
    }

    impl Env {
        fn new() -> Self {
            Self::with_manager(|templates| CopyManager::new(templates))
        }

        fn with_manager(make: impl FnOnce(PathBuf) -> CopyManager) -> Self {
            let temp = TempDir::new().unwrap();
            let home = temp.path().join("home");
            let ironman = Ironman::builder(&home)
                .config(Config::default())
                .manager(make(home.join(TEMPLATES_DIRECTORY)))
                .index(MemoryIndex::new())
                .build()
                .unwrap();
            ironman.ensure_home().unwrap();
            Self {
                temp,
                ironman,
            }
        }

        fn fixture(&self, name: &str) -> PathBuf {
            TemplateFixture::new(name).write_to(&self.temp.path().join("sources")).unwrap()
        }

        fn path(&self, relative: &str) -> PathBuf {
            self.temp.path().join(relative)
        }

        fn locator(path: &Path) -> String {
            path.display().to_string()
        }
    }

    fn values(name: &str) -> Values {
        let mut values = Values::new();
        values.insert("name".to_string(), serde_json::json!(name));
        values
    }

    #[tokio::test]
    async fn test_install_indexes_and_materializes() {
        let env = Env::new();
        let source = env.fixture("base");

        let template = env.ironman.install(&Env::locator(&source)).await.unwrap();

        assert_eq!(template.id, "base");
        assert_eq!(template.source_type, SourceType::Url);
        assert_eq!(template.directory_name, "base");
        assert!(env.ironman.template_location("base").is_dir());
        assert_eq!(env.ironman.list().unwrap(), vec![template]);
    }

    #[tokio::test]
    async fn test_install_twice_is_conflict() {
        let env = Env::new();
        let source = env.fixture("base");

        env.ironman.install(&Env::locator(&source)).await.unwrap();
        let err = env.ironman.install(&Env::locator(&source)).await.unwrap_err();

        assert_eq!(error_kind(&err), Some(ErrorKind::Conflict));
        assert_eq!(env.ironman.list().unwrap().len(), 1);
        assert!(env.ironman.template_location("base").is_dir());
    }

    #[tokio::test]
    async fn test_invalid_template_is_rolled_back() {
        let env = Env::new();
        let source = TemplateFixture::new("broken")
            .version("not-semver")
            .write_to(&env.path("sources"))
            .unwrap();

        let err = env.ironman.install(&Env::locator(&source)).await.unwrap_err();

        assert_eq!(error_kind(&err), Some(ErrorKind::ValidationFailed));
        match find_ironman_error(&err) {
            Some(IronmanError::ValidationFailed {
                message,
                report,
                ..
            }) => {
                assert!(message.starts_with("Template 'broken' is not valid:"));
                assert_eq!(report.errors[0].field, "version");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!env.ironman.template_location("broken").exists());
        assert!(env.ironman.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_metadata_is_rolled_back() {
        let env = Env::new();
        let source = env.fixture("base");
        std::fs::write(source.join(".ironman.yaml"), "id: [unterminated").unwrap();

        let err = env.ironman.install(&Env::locator(&source)).await.unwrap_err();

        assert_eq!(error_kind(&err), Some(ErrorKind::InvalidMetadata));
        assert!(!env.ironman.template_location("base").exists());
    }

    #[tokio::test]
    async fn test_failed_rollback_keeps_primary_error() {
        let env = Env::with_manager(|templates| CopyManager::new(templates).failing_removal());
        let source = TemplateFixture::new("broken").version("x").write_to(&env.path("sources")).unwrap();

        let err = env.ironman.install(&Env::locator(&source)).await.unwrap_err();

        assert_eq!(error_kind(&err), Some(ErrorKind::ValidationFailed));
        assert!(err.to_string().contains("Rollback of 'broken' also failed"));
    }

    struct PanickingValidator;

    impl Validator for PanickingValidator {
        fn validate(&self, _template: &Template) -> Result<crate::validator::Validation> {
            panic!("validator crashed");
        }
    }

    #[test]
    fn test_panic_after_link_is_rolled_back() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let validators: Vec<Box<dyn Validator>> = vec![Box::new(PanickingValidator)];
        let ironman = Ironman::builder(&home)
            .config(Config::default())
            .manager(CopyManager::new(home.join(TEMPLATES_DIRECTORY)))
            .index(MemoryIndex::new())
            .validators(validators)
            .build()
            .unwrap();
        ironman.ensure_home().unwrap();
        let source = TemplateFixture::new("base").write_to(&temp.path().join("sources")).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| ironman.link(&source, "local")));

        assert!(result.is_err());
        assert!(std::fs::symlink_metadata(ironman.template_location("local")).is_err());
        assert!(ironman.list().unwrap().is_empty());
        assert!(source.join(".ironman.yaml").exists());
    }

    #[tokio::test]
    async fn test_uninstall() {
        let env = Env::new();
        let source = env.fixture("base");
        env.ironman.install(&Env::locator(&source)).await.unwrap();

        env.ironman.uninstall("base").unwrap();

        assert!(env.ironman.list().unwrap().is_empty());
        assert!(!env.ironman.template_location("base").exists());
        // The source is never touched
        assert!(source.join(".ironman.yaml").exists());
    }

    #[tokio::test]
    async fn test_uninstall_unknown_mutates_nothing() {
        let env = Env::new();
        let source = env.fixture("base");
        env.ironman.install(&Env::locator(&source)).await.unwrap();

        let err = env.ironman.uninstall("other").unwrap_err();

        assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));
        assert_eq!(env.ironman.list().unwrap().len(), 1);
        assert!(env.ironman.template_location("base").is_dir());
    }

    #[tokio::test]
    async fn test_update_uses_directory_name_and_keeps_index() {
        let env = Env::new();
        let source = env.fixture("base");
        let installed = env.ironman.install(&Env::locator(&source)).await.unwrap();

        env.ironman.update("base").await.unwrap();
        assert_eq!(env.ironman.list().unwrap(), vec![installed]);

        let err = env.ironman.update("missing").await.unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_link_and_unlink() {
        let env = Env::new();
        let source = env.fixture("local");

        let template = env.ironman.link(&source, "mine").unwrap();
        assert_eq!(template.id, "mine");
        assert_eq!(template.directory_name, "mine");
        assert_eq!(template.source_type, SourceType::Link);

        let err = env.ironman.link(&source, "mine").unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Conflict));

        env.ironman.unlink("mine").unwrap();
        assert!(env.ironman.list().unwrap().is_empty());
        assert!(env.ironman.template_location("mine").symlink_metadata().is_err());
        assert!(source.join(".ironman.yaml").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invalid_link_is_unlinked() {
        let env = Env::new();
        let source = TemplateFixture::new("local").without_generators().write_to(&env.path("sources")).unwrap();

        let err = env.ironman.link(&source, "mine").unwrap_err();

        assert_eq!(error_kind(&err), Some(ErrorKind::ValidationFailed));
        assert!(env.ironman.template_location("mine").symlink_metadata().is_err());
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_unlink_of_installed_template_is_refused() {
        let env = Env::new();
        let source = env.fixture("base");
        env.ironman.install(&Env::locator(&source)).await.unwrap();

        let err = env.ironman.unlink("base").unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Conflict));
        assert!(env.ironman.template_location("base").is_dir());
    }

    #[tokio::test]
    async fn test_generate_directory() {
        let env = Env::new();
        let source = env.fixture("base");
        env.ironman.install(&Env::locator(&source)).await.unwrap();

        let out = env.path("out");
        let report = env.ironman.generate("base", "app", &out, &values("demo"), false).await.unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(std::fs::read_to_string(out.join("README.md")).unwrap(), "# demo\n");

        let err = env.ironman.generate("base", "app", &out, &values("again"), false).await.unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Conflict));
        assert_eq!(std::fs::read_to_string(out.join("README.md")).unwrap(), "# demo\n");

        env.ironman.generate("base", "app", &out, &values("again"), true).await.unwrap();
        assert_eq!(std::fs::read_to_string(out.join("README.md")).unwrap(), "# again\n");
    }

    #[tokio::test]
    async fn test_generate_unknown_ids() {
        let env = Env::new();
        let source = env.fixture("base");
        env.ironman.install(&Env::locator(&source)).await.unwrap();

        let err = env.ironman.generate("nope", "app", &env.path("out"), &Values::new(), false).await.unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));

        let err = env.ironman.generate("base", "ap", &env.path("out"), &Values::new(), false).await.unwrap_err();
        match find_ironman_error(&err) {
            Some(IronmanError::GeneratorNotFound {
                similar,
                ..
            }) => assert_eq!(similar.as_deref(), Some("app")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!env.path("out").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_generate_refreshes_linked_metadata() {
        let env = Env::new();
        let source = env.fixture("local");
        env.ironman.link(&source, "mine").unwrap();

        let extra = source.join("generators/extra");
        std::fs::create_dir_all(&extra).unwrap();
        std::fs::write(extra.join(".ironman.yaml"), "name: Extra\n").unwrap();
        std::fs::write(extra.join("NOTES.md"), "{{ values.name }}\n").unwrap();

        env.ironman.generate("mine", "extra", &env.path("out"), &values("demo"), false).await.unwrap();

        let indexed = env.ironman.list().unwrap().remove(0);
        assert_eq!(indexed.id, "mine");
        assert_eq!(indexed.source_type, SourceType::Link);
        assert!(indexed.generator("extra").is_some());
    }

    #[test]
    fn test_create_scaffolds_a_valid_template() {
        let env = Env::new();
        let path = env.path("new-template");

        let template = env.ironman.create(&path).unwrap();

        assert_eq!(template.id, "new-template");
        assert_eq!(template.generator_ids().collect::<Vec<_>>(), vec!["app"]);
        assert!(MetadataValidator.validate(&template).unwrap().valid);

        let err = env.ironman.create(&path).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Conflict));
    }

    #[test]
    fn test_closest_match() {
        let ids = ["app", "controller", "model"];
        assert_eq!(closest_match("ap", ids.into_iter()), Some("app".to_string()));
        assert_eq!(closest_match("controler", ids.into_iter()), Some("controller".to_string()));
        assert_eq!(closest_match("zzzzzzzz", ids.into_iter()), None);
    }
}
