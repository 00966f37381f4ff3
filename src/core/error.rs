//! Error handling for Ironman
//!
//! This module provides the error types and user-facing error reporting for the
//! template manager. Two principles drive the design:
//! 1. **Strongly-typed errors** so callers can tell a bad template from an I/O failure
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`IronmanError`] - every failure case, carrying the offending ID or path
//! - [`ErrorKind`] - the coarse classification callers branch on
//! - [`ErrorContext`] - wraps an error with details and a suggestion for display
//!
//! Lower layers return [`anyhow::Result`] with an [`IronmanError`] at the root and
//! add context with `with_context`. Because `anyhow` keeps the root error
//! downcastable, [`error_kind`] can always recover the classification.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ironman::core::{ErrorKind, IronmanError, error_kind};
//!
//! let err = anyhow::Error::from(IronmanError::TemplateNotInstalled {
//!     id: "base".to_string(),
//! })
//! .context("Failed to uninstall template");
//!
//! assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::validator::ValidationReport;

/// Coarse classification of an [`IronmanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An ID is absent from the index, or an expected path is missing.
    NotFound,
    /// Duplicate ID, occupied location, non-empty target or existing file.
    Conflict,
    /// Template metadata failed a registered validator.
    ValidationFailed,
    /// A declaration file could not be decoded.
    InvalidMetadata,
    /// A template file could not be rendered.
    RenderFailed,
    /// The transport could not fetch or refresh a template.
    FetchFailed,
    /// The filesystem refused an operation.
    PermissionDenied,
    /// Any other filesystem failure.
    IoFailure,
    /// A generation path precondition was not met.
    InvalidTarget,
    /// A caller-supplied identifier or setting is malformed.
    InvalidInput,
}

/// The main error type for Ironman operations.
#[derive(Error, Debug)]
pub enum IronmanError {
    #[error("Template '{id}' is not installed")]
    TemplateNotInstalled {
        id: String,
    },

    #[error("Template '{id}' is already installed")]
    TemplateAlreadyInstalled {
        id: String,
    },

    #[error("Generator '{generator}' does not exist in template '{template}'")]
    GeneratorNotFound {
        template: String,
        generator: String,
        /// Closest generator ID, when one is similar enough to suggest
        similar: Option<String>,
    },

    #[error("Path does not exist: {path}")]
    PathNotFound {
        path: String,
    },

    #[error("Template location is already occupied: {path}")]
    LocationOccupied {
        path: String,
    },

    #[error("Template location is not a link: {path}")]
    NotALink {
        path: String,
    },

    #[error("Generation path is not empty: {path}")]
    TargetNotEmpty {
        path: String,
    },

    #[error("File already exists: {path}")]
    FileAlreadyExists {
        path: String,
    },

    #[error("{message}")]
    ValidationFailed {
        id: String,
        /// Human readable rendering of `report`
        message: String,
        report: ValidationReport,
    },

    #[error("Invalid metadata in {file}: {reason}")]
    MetadataParseError {
        file: String,
        reason: String,
    },

    #[error("Failed to render {file}: {reason}")]
    RenderFailed {
        file: String,
        reason: String,
    },

    #[error("Failed to fetch template from {locator}")]
    FetchFailed {
        locator: String,
        reason: String,
    },

    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    #[error("Git operation failed: {operation}")]
    GitCommandError {
        operation: String,
        stderr: String,
    },

    #[error("Permission denied: {operation} {path}")]
    PermissionDenied {
        operation: String,
        path: String,
    },

    #[error("File system error: {operation} {path}")]
    FileSystemError {
        operation: String,
        path: String,
        reason: String,
    },

    #[error("Invalid generation target {path}: {reason}")]
    InvalidTarget {
        path: String,
        reason: String,
    },

    #[error("Invalid template ID '{id}': {reason}")]
    InvalidTemplateId {
        id: String,
        reason: String,
    },

    #[error("Invalid configuration in {file}: {reason}")]
    ConfigError {
        file: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{message}")]
    Other {
        message: String,
    },
}

impl IronmanError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TemplateNotInstalled {
                ..
            }
            | Self::GeneratorNotFound {
                ..
            }
            | Self::PathNotFound {
                ..
            } => ErrorKind::NotFound,
            Self::TemplateAlreadyInstalled {
                ..
            }
            | Self::LocationOccupied {
                ..
            }
            | Self::NotALink {
                ..
            }
            | Self::TargetNotEmpty {
                ..
            }
            | Self::FileAlreadyExists {
                ..
            } => ErrorKind::Conflict,
            Self::ValidationFailed {
                ..
            } => ErrorKind::ValidationFailed,
            Self::MetadataParseError {
                ..
            } => ErrorKind::InvalidMetadata,
            Self::RenderFailed {
                ..
            } => ErrorKind::RenderFailed,
            Self::FetchFailed {
                ..
            }
            | Self::GitNotFound
            | Self::GitCommandError {
                ..
            } => ErrorKind::FetchFailed,
            Self::PermissionDenied {
                ..
            } => ErrorKind::PermissionDenied,
            Self::InvalidTarget {
                ..
            } => ErrorKind::InvalidTarget,
            Self::InvalidTemplateId {
                ..
            }
            | Self::ConfigError {
                ..
            } => ErrorKind::InvalidInput,
            Self::IoError(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorKind::PermissionDenied
            }
            Self::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            Self::FileSystemError {
                ..
            }
            | Self::IoError(_)
            | Self::Other {
                ..
            } => ErrorKind::IoFailure,
        }
    }

    /// Build a filesystem error from an [`std::io::Error`], keeping permission
    /// failures distinct from everything else.
    pub fn from_io(operation: impl Into<String>, path: &std::path::Path, error: &std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                operation: operation.into(),
                path: path.display().to_string(),
            }
        } else {
            Self::FileSystemError {
                operation: operation.into(),
                path: path.display().to_string(),
                reason: error.to_string(),
            }
        }
    }
}

impl Clone for IronmanError {
    fn clone(&self) -> Self {
        match self {
            Self::TemplateNotInstalled {
                id,
            } => Self::TemplateNotInstalled {
                id: id.clone(),
            },
            Self::TemplateAlreadyInstalled {
                id,
            } => Self::TemplateAlreadyInstalled {
                id: id.clone(),
            },
            Self::GeneratorNotFound {
                template,
                generator,
                similar,
            } => Self::GeneratorNotFound {
                template: template.clone(),
                generator: generator.clone(),
                similar: similar.clone(),
            },
            Self::PathNotFound {
                path,
            } => Self::PathNotFound {
                path: path.clone(),
            },
            Self::LocationOccupied {
                path,
            } => Self::LocationOccupied {
                path: path.clone(),
            },
            Self::NotALink {
                path,
            } => Self::NotALink {
                path: path.clone(),
            },
            Self::TargetNotEmpty {
                path,
            } => Self::TargetNotEmpty {
                path: path.clone(),
            },
            Self::FileAlreadyExists {
                path,
            } => Self::FileAlreadyExists {
                path: path.clone(),
            },
            Self::ValidationFailed {
                id,
                message,
                report,
            } => Self::ValidationFailed {
                id: id.clone(),
                message: message.clone(),
                report: report.clone(),
            },
            Self::MetadataParseError {
                file,
                reason,
            } => Self::MetadataParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::RenderFailed {
                file,
                reason,
            } => Self::RenderFailed {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::FetchFailed {
                locator,
                reason,
            } => Self::FetchFailed {
                locator: locator.clone(),
                reason: reason.clone(),
            },
            Self::GitNotFound => Self::GitNotFound,
            Self::GitCommandError {
                operation,
                stderr,
            } => Self::GitCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::PermissionDenied {
                operation,
                path,
            } => Self::PermissionDenied {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
                reason,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::InvalidTarget {
                path,
                reason,
            } => Self::InvalidTarget {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::InvalidTemplateId {
                id,
                reason,
            } => Self::InvalidTemplateId {
                id: id.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                file,
                reason,
            } => Self::ConfigError {
                file: file.clone(),
                reason: reason.clone(),
            },
            // std::io::Error is not Clone
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Find the first [`IronmanError`] in an error chain.
#[must_use]
pub fn find_ironman_error(error: &anyhow::Error) -> Option<&IronmanError> {
    error.chain().find_map(|cause| cause.downcast_ref::<IronmanError>())
}

/// Classify an [`anyhow::Error`] by the first [`IronmanError`] in its chain.
///
/// Plain [`std::io::Error`]s are classified as well so callers do not need to
/// care whether a lower layer wrapped them.
#[must_use]
pub fn error_kind(error: &anyhow::Error) -> Option<ErrorKind> {
    if let Some(err) = find_ironman_error(error) {
        return Some(err.kind());
    }

    error.chain().find_map(|cause| cause.downcast_ref::<std::io::Error>()).map(|io| {
        match io.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::IoFailure,
        }
    })
}

/// An error enriched with details and a suggestion for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: IronmanError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: IronmanError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for the CLI.
///
/// The outermost message (the operation-level context) becomes the details when
/// it differs from the typed root error, so nothing the orchestrator attached
/// is lost.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(typed) = find_ironman_error(&error) {
        let outer = error.to_string();
        let mut ctx = create_error_context(typed.clone());
        if outer != typed.to_string() {
            ctx.details = Some(match ctx.details.take() {
                Some(details) if !details.is_empty() => format!("{outer}\n{details}"),
                _ => outer,
            });
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(IronmanError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the ironman home")
                .with_details(io_error.to_string());
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(IronmanError::PathNotFound {
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(io_error.to_string());
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(IronmanError::Other {
        message,
    })
}

fn create_error_context(error: IronmanError) -> ErrorContext {
    match &error {
        IronmanError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("Ironman fetches templates with git, so it must be available in your PATH"),

        IronmanError::GitCommandError { stderr, .. } => {
            let details = stderr.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Check the repository URL and your access to it. Try running the git command manually for more details")
                .with_details(details)
        }

        IronmanError::FetchFailed { reason, .. } => {
            let details = reason.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Verify the template locator is a repository git can clone")
                .with_details(details)
        }

        IronmanError::TemplateNotInstalled { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'ironman list' to see installed templates"),

        IronmanError::TemplateAlreadyInstalled { id } => {
            let suggestion = format!("Run 'ironman uninstall {id}' first, or 'ironman update {id}' to refresh it");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        IronmanError::LocationOccupied { .. } => ErrorContext::new(error)
            .with_suggestion("Uninstall or unlink the template occupying this location, or choose another ID"),

        IronmanError::GeneratorNotFound { similar: Some(similar), .. } => {
            let suggestion = format!("Did you mean '{similar}'?");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        IronmanError::TargetNotEmpty { .. } | IronmanError::FileAlreadyExists { .. } => {
            ErrorContext::new(error).with_suggestion("Use --force to overwrite existing content")
        }

        IronmanError::MetadataParseError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the syntax of the template's .ironman metadata files"),

        IronmanError::RenderFailed { .. } => ErrorContext::new(error)
            .with_suggestion("Check template syntax: variables use {{ values.name }}, control flow uses {% %}. Pass missing values with --set name=value"),

        IronmanError::PermissionDenied { operation, path } => {
            let details = format!("Cannot {operation} due to insufficient permissions on {path}");
            ErrorContext::new(error)
                .with_suggestion(if cfg!(windows) {
                    "Run as Administrator or check file permissions in File Explorer"
                } else {
                    "Check file permissions with 'ls -la'"
                })
                .with_details(details)
        }

        _ => ErrorContext::new(error),
    }
}
