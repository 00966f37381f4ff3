//! `ironman create <path>`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use crate::ironman::Ironman;
use crate::utils::platform::resolve_path;

#[derive(Args)]
pub struct CreateCommand {
    /// Folder to create; its name becomes the template ID
    path: String,
}

impl CreateCommand {
    pub fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        let path = resolve_path(&self.path)?;
        let template = ironman.create(&path)?;
        config.status(format!("{} Created template '{}' at {}", "✓".green(), template.id.bold(), path.display()));
        config.status(format!("  Link it with: ironman link {} {}", path.display(), template.id));
        Ok(())
    }
}
