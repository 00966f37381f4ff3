//! Command-line interface for Ironman
//!
//! Every subcommand is a thin wrapper over one [`Ironman`] operation. Global
//! flags:
//!
//! - `--home <dir>` - ironman home (falls back to `IRONMAN_HOME`, then `~/.ironman`)
//! - `--verbose` - debug logging
//! - `--quiet` - no logging, no spinners, no progress messages
//!
//! ```bash
//! ironman install https://github.com/example/rust-service.git
//! ironman generate rust-service:app ./my-service --set name=my-service
//! ironman list
//! ```

mod create;
mod generate;
mod install;
mod link;
mod list;
mod uninstall;
mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::resolve_home;
use crate::ironman::Ironman;
use crate::utils::progress::ProgressBar;

/// Output settings derived from the global flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliConfig {
    pub quiet: bool,
}

impl CliConfig {
    /// A spinner, or a hidden one when quiet.
    #[must_use]
    pub fn spinner(&self, message: impl Into<String>) -> ProgressBar {
        let spinner = if self.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        spinner.set_message(message);
        spinner
    }

    /// Print a status line unless quiet.
    pub fn status(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{message}");
        }
    }
}

#[derive(Parser)]
#[command(
    name = "ironman",
    about = "Install project templates and generate code from them",
    version,
    long_about = "Ironman installs templates from git repositories or local folders and renders their generators into new files and directories."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ironman home directory
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress everything except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a template from a git locator
    Install(install::InstallCommand),

    /// Pull the latest revision of an installed template
    Update(update::UpdateCommand),

    /// Remove an installed template
    Uninstall(uninstall::UninstallCommand),

    /// Register a local template folder by symlink
    Link(link::LinkCommand),

    /// Remove a linked template, leaving its folder untouched
    Unlink(link::UnlinkCommand),

    /// List installed and linked templates
    List(list::ListCommand),

    /// Render a generator into a file or directory
    Generate(generate::GenerateCommand),

    /// Scaffold a new template folder
    Create(create::CreateCommand),
}

impl Cli {
    /// Install logging, open the home and run the subcommand.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();
        let config = self.build_config();

        let home = resolve_home(self.home.as_deref())?;
        let ironman = Ironman::new(home)?;

        ironman.ensure_home()?;

        match self.command {
            Commands::Install(cmd) => cmd.execute(&ironman, config).await,
            Commands::Update(cmd) => cmd.execute(&ironman, config).await,
            Commands::Uninstall(cmd) => cmd.execute(&ironman, config),
            Commands::Link(cmd) => cmd.execute(&ironman, config),
            Commands::Unlink(cmd) => cmd.execute(&ironman, config),
            Commands::List(cmd) => cmd.execute(&ironman, config),
            Commands::Generate(cmd) => cmd.execute(&ironman, config).await,
            Commands::Create(cmd) => cmd.execute(&ironman, config),
        }
    }

    #[must_use]
    pub const fn build_config(&self) -> CliConfig {
        CliConfig {
            quiet: self.quiet,
        }
    }

    /// `RUST_LOG` wins; otherwise `debug` with `--verbose`, `warn` by default
    /// and nothing with `--quiet`.
    fn log_filter(&self) -> Option<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Some(filter);
        }
        if self.quiet {
            None
        } else if self.verbose {
            Some(EnvFilter::new("ironman=debug"))
        } else {
            Some(EnvFilter::new("warn"))
        }
    }

    fn init_logging(&self) {
        if let Some(filter) = self.log_filter() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(self.verbose)
                .try_init();
        }
    }
}
