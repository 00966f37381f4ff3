//! `ironman uninstall <id>`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use crate::ironman::Ironman;

#[derive(Args)]
pub struct UninstallCommand {
    /// ID of an installed template
    id: String,
}

impl UninstallCommand {
    pub fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        ironman.uninstall(&self.id)?;
        config.status(format!("{} Uninstalled template '{}'", "✓".green(), self.id.bold()));
        Ok(())
    }
}
