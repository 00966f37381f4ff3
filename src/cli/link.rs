//! `ironman link <path> <id>` and `ironman unlink <id>`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use crate::ironman::Ironman;
use crate::utils::platform::resolve_path;

#[derive(Args)]
pub struct LinkCommand {
    /// Template folder to link
    path: String,

    /// ID to register the template under
    id: String,
}

impl LinkCommand {
    pub fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        let path: PathBuf = resolve_path(&self.path)?;
        let template = ironman.link(&path, &self.id)?;
        config.status(format!(
            "{} Linked template '{}' -> {}",
            "✓".green(),
            template.id.bold(),
            path.display()
        ));
        Ok(())
    }
}

#[derive(Args)]
pub struct UnlinkCommand {
    /// ID of a linked template
    id: String,
}

impl UnlinkCommand {
    pub fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        ironman.unlink(&self.id)?;
        config.status(format!("{} Unlinked template '{}'", "✓".green(), self.id.bold()));
        Ok(())
    }
}
