//! Structured template rendering errors.
//!
//! Tera reports failures as a chain of loosely formatted messages. The renderer
//! parses them into a [`TemplateError`] that knows which file and line failed
//! and, for undefined variables, which variables were available instead.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::core::IronmanError;

/// Template rendering failure with location and suggestions.
#[derive(Debug)]
pub enum TemplateError {
    VariableNotFound {
        variable: String,
        suggestions: Vec<String>,
        location: Box<ErrorLocation>,
    },

    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Where in a generator source a rendering error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Source file relative to the generator root, if known
    pub file_path: Option<PathBuf>,
    /// Line number if available from Tera
    pub line_number: Option<usize>,
    /// Numbered lines around `line_number`
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VariableNotFound {
                variable,
                ..
            } => write!(f, "Template variable not found: '{variable}'"),
            Self::SyntaxError {
                message,
                ..
            } => write!(f, "Template syntax error: {message}"),
        }
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    pub fn location(&self) -> &ErrorLocation {
        match self {
            Self::VariableNotFound {
                location,
                ..
            }
            | Self::SyntaxError {
                location,
                ..
            } => location,
        }
    }

    /// Multi-line description with the failing line and suggestions.
    pub fn format_with_context(&self) -> String {
        let mut msg = self.to_string();
        let location = self.location();

        if let Some(line) = location.line_number {
            let _ = write!(msg, " (line {line})");
        }
        msg.push('\n');

        if let Some(lines) = &location.context_lines {
            msg.push('\n');
            for (number, text) in lines {
                let marker = if Some(*number) == location.line_number {
                    ">"
                } else {
                    " "
                };
                let _ = writeln!(msg, "{marker} {number:>4} | {text}");
            }
        }

        if let Self::VariableNotFound {
            suggestions,
            ..
        } = self
            && !suggestions.is_empty()
        {
            msg.push_str("\nDid you mean one of these?\n");
            for suggestion in suggestions {
                let _ = writeln!(msg, "  - {suggestion}");
            }
        }

        msg.trim_end().to_string()
    }

    /// Convert into the crate error, naming the file that failed.
    pub fn into_ironman_error(self) -> IronmanError {
        let file = self
            .location()
            .file_path
            .as_ref()
            .map_or_else(|| "template".to_string(), |path| path.display().to_string());

        IronmanError::RenderFailed {
            file,
            reason: self.format_with_context(),
        }
    }
}
