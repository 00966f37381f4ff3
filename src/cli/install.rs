//! `ironman install <locator>`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use crate::ironman::Ironman;

#[derive(Args)]
pub struct InstallCommand {
    /// Anything `git clone` accepts: URL, scp-style address or local path
    locator: String,
}

impl InstallCommand {
    pub async fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        let spinner = config.spinner(format!("Installing {}", self.locator));
        let result = ironman.install(&self.locator).await;
        spinner.finish_and_clear();

        let template = result?;
        config.status(format!(
            "{} Installed template '{}' ({} generators)",
            "✓".green(),
            template.id.bold(),
            template.generators.len()
        ));
        Ok(())
    }
}
