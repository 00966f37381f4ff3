//! Integration test suite for Ironman
//!
//! End-to-end tests of the library API and the `ironman` binary against
//! temporary homes and real git repositories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **lifecycle**: install, update, uninstall, link and unlink through the library
//! - **generate**: directory and file generators through the library
//! - **cli**: the binary, its output and exit codes

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod generate;
mod lifecycle;
