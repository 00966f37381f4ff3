//! `ironman update <id>`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use crate::ironman::Ironman;

#[derive(Args)]
pub struct UpdateCommand {
    /// ID of an installed template
    id: String,
}

impl UpdateCommand {
    pub async fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        let spinner = config.spinner(format!("Updating {}", self.id));
        let result = ironman.update(&self.id).await;
        spinner.finish_and_clear();

        result?;
        config.status(format!("{} Updated template '{}'", "✓".green(), self.id.bold()));
        Ok(())
    }
}
