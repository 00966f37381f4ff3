//! Template rendering engine with Tera.

use regex::Regex;
use std::path::Path;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::context::variable_paths;
use super::error::{ErrorLocation, TemplateError};

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Lines shown before and after a failing line.
const CONTEXT_LINES: usize = 3;

/// Renders strings against one fixed context.
///
/// A generation run builds one renderer and reuses it for every file and path
/// component of the generator.
pub struct TemplateRenderer {
    context: TeraContext,
}

impl TemplateRenderer {
    #[must_use]
    pub const fn new(context: TeraContext) -> Self {
        Self {
            context,
        }
    }

    /// Render `content`. `source` names the file for error reporting.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] when the template has invalid syntax or
    /// references a variable missing from the context.
    pub fn render(&self, content: &str, source: Option<&Path>) -> Result<String, TemplateError> {
        // Fresh instance per render; one-off templates are never autoescaped
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.render_str(content, &self.context).map_err(|e| self.parse_tera_error(&e, content, source))
    }

    /// Parse a Tera error into a structured [`TemplateError`].
    fn parse_tera_error(&self, error: &tera::Error, content: &str, source: Option<&Path>) -> TemplateError {
        let line_number = Self::extract_line_from_tera_error(error);
        let context_lines = line_number
            .map(|line| Self::extract_context_lines(content, line, CONTEXT_LINES))
            .filter(|lines| !lines.is_empty());

        let location = Box::new(ErrorLocation {
            file_path: source.map(Path::to_path_buf),
            line_number,
            context_lines,
        });

        let message = Self::format_tera_error(error);
        if let Some(variable) = Self::extract_variable_name(&message) {
            let suggestions = Self::find_similar_variables(&variable, &variable_paths(&self.context));
            return TemplateError::VariableNotFound {
                variable,
                suggestions,
                location,
            };
        }

        TemplateError::SyntaxError {
            message,
            location,
        }
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        re.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> = available.iter().map(|var| (var, levenshtein(target, var))).collect();
        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var.clone())
            .collect()
    }

    /// Up to `context_size` lines on either side of `error_line`, numbered from 1.
    fn extract_context_lines(content: &str, error_line: usize, context_size: usize) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if error_line == 0 || error_line > total_lines {
            return Vec::new();
        }

        let start = error_line.saturating_sub(context_size + 1);
        let end = (error_line + context_size).min(total_lines);

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(idx, line)| (start + idx + 1, (*line).to_string()))
            .collect()
    }

    /// Tera includes `line:column` in parse error messages, e.g. `1:7`.
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = format!("{error:?}");
        let re = Regex::new(r"(\d+):(\d+)").ok()?;
        re.captures(&error_msg).and_then(|caps| caps.get(1)).and_then(|m| m.as_str().parse().ok())
    }

    /// Collapse the Tera error chain into one readable message, dropping the
    /// internal `__tera_one_off` template name.
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut all_messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            all_messages.push(err.to_string());
            current_error = err.source();
        }

        let messages: Vec<String> = all_messages
            .into_iter()
            .map(|msg| {
                msg.replace("while rendering '__tera_one_off'", "")
                    .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                    .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                    .replace("'__tera_one_off'", "template")
                    .replace("\"__tera_one_off\"", "template")
                    .trim()
                    .to_string()
            })
            .filter(|cleaned| {
                !cleaned.is_empty()
                    && cleaned != "Template rendering failed"
                    && cleaned != "Template syntax error"
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}
