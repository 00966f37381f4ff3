//! Core types shared across Ironman.
//!
//! Currently this is the error model: the typed [`IronmanError`], its coarse
//! [`ErrorKind`] classification and the [`ErrorContext`] used for terminal output.

pub mod error;

pub use error::{
    ErrorContext, ErrorKind, IronmanError, error_kind, find_ironman_error, user_friendly_error,
};
