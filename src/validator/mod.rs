//! Template validation.
//!
//! Validators inspect a freshly read [`Template`] before it is indexed. A
//! validator returns a [`Validation`]: whether the template is valid plus a
//! structured [`ValidationReport`]. The orchestrator renders the report through
//! [`VALIDATION_TEMPLATE`] to produce the user-facing message, so callers get
//! both a readable error and the structured payload.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::{GeneratorType, Template};

/// Fixed text template used to render a failed [`ValidationReport`].
pub const VALIDATION_TEMPLATE: &str = "\
Template '{{ report.template_id }}' is not valid:
{% for error in report.errors %}  - {{ error.field }}: {{ error.message }}
{% endfor %}";

/// A single problem found by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `generators.app.type`
    pub field: String,
    pub message: String,
}

/// Structured outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub template_id: String,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    #[must_use]
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            errors: Vec::new(),
        }
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Render `report` through [`VALIDATION_TEMPLATE`].
pub fn render_report(report: &ValidationReport) -> Result<String> {
    let context = tera::Context::from_serialize(serde_json::json!({ "report": report }))?;
    let message = tera::Tera::one_off(VALIDATION_TEMPLATE, &context, false)?;
    Ok(message.trim_end().to_string())
}

/// Result of [`Validator::validate`].
#[derive(Debug, Clone)]
pub struct Validation {
    pub valid: bool,
    pub report: ValidationReport,
}

impl From<ValidationReport> for Validation {
    fn from(report: ValidationReport) -> Self {
        Self {
            valid: report.is_empty(),
            report,
        }
    }
}

/// Checks a template before it is indexed.
pub trait Validator: Send + Sync {
    /// Validate `template`.
    ///
    /// # Errors
    ///
    /// An `Err` means the validator itself could not run; an invalid template
    /// is reported through [`Validation::valid`].
    fn validate(&self, template: &Template) -> Result<Validation>;
}

/// Built-in structural checks on template metadata.
///
/// - the template ID is non-empty and a valid directory name
/// - `version`, when present, is valid semver
/// - the template declares at least one generator
/// - generator IDs are unique
/// - only file generators carry `file_type_options`, and their relative path
///   stays inside the target's parent
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataValidator;

impl Validator for MetadataValidator {
    fn validate(&self, template: &Template) -> Result<Validation> {
        let mut report = ValidationReport::new(&template.id);

        if let Err(e) = crate::manager::validate_template_id(&template.id) {
            report.add("id", e.to_string());
        }

        if let Some(version) = &template.version
            && let Err(e) = semver::Version::parse(version)
        {
            report.add("version", format!("'{version}' is not a valid semantic version: {e}"));
        }

        if template.generators.is_empty() {
            report.add("generators", "template does not declare any generator");
        }

        let mut seen = HashSet::new();
        for generator in &template.generators {
            let field = format!("generators.{}", generator.directory_name);

            if !seen.insert(generator.id.as_str()) {
                report.add(&field, format!("duplicate generator ID '{}'", generator.id));
            }

            match (generator.ttype, &generator.file_type_options) {
                (GeneratorType::Directory, Some(_)) => {
                    report.add(
                        format!("{field}.file_type_options"),
                        "only file generators accept file_type_options",
                    );
                }
                (GeneratorType::File, Some(options)) => {
                    let relative = &options.file_generation_relative_path;
                    let escapes = relative.is_absolute()
                        || relative
                            .components()
                            .any(|c| matches!(c, std::path::Component::ParentDir));
                    if escapes {
                        report.add(
                            format!("{field}.file_type_options.file_generation_relative_path"),
                            format!("'{}' must be a relative path without '..'", relative.display()),
                        );
                    }
                }
                _ => {}
            }
        }

        Ok(report.into())
    }
}
