//! Tera templating for generator sources.
//!
//! Every file under a generator, and every component of its relative path,
//! is rendered through Tera with a context of three namespaces:
//!
//! - `template`: the [`Template`](crate::model::Template) being generated from
//! - `generator`: the selected [`Generator`](crate::model::Generator)
//! - `values`: the [`Values`](crate::model::Values) supplied by the caller
//!
//! # Supported Features
//!
//! - Variable substitution: `{{ values.name }}`
//! - Conditional logic: `{% if values.with_tests %}...{% endif %}`
//! - Loops: `{% for dep in values.dependencies %}...{% endfor %}`
//! - Standard Tera filters (`upper`, `snake_case` via `replace`, `default`, ...)
//!
//! Undefined variables are errors rather than empty strings, so a typo in a
//! template surfaces with suggestions instead of silently generating blanks.
//! Templates are rendered one-off: `{% include %}` and `{% extends %}` have
//! nothing to resolve against.
//!
//! # Example
//!
//! ```rust,no_run
//! use ironman::model::{Generator, Template, Values};
//! use ironman::templating::{RenderContext, TemplateRenderer};
//!
//! # fn example() -> anyhow::Result<()> {
//! let template = Template::default();
//! let generator = Generator::default();
//! let mut values = Values::new();
//! values.insert("name".to_string(), "ironman".into());
//!
//! let renderer = TemplateRenderer::new(RenderContext::new(&template, &generator, &values).build()?);
//! let rendered = renderer.render("Hello {{ values.name }}", None)?;
//! assert_eq!(rendered, "Hello ironman");
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod renderer;

pub use context::RenderContext;
pub use error::{ErrorLocation, TemplateError};
pub use renderer::TemplateRenderer;

/// Whether `content` contains any Tera delimiters worth rendering.
#[must_use]
pub fn contains_template_syntax(content: &str) -> bool {
    content.contains("{{") || content.contains("{%") || content.contains("{#")
}
