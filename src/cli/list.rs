//! `ironman list`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use crate::ironman::Ironman;
use crate::model::{SourceType, Template};

#[derive(Args)]
pub struct ListCommand {
    /// Print the index as JSON
    #[arg(long)]
    json: bool,
}

impl ListCommand {
    pub fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        let templates = ironman.list()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&templates)?);
            return Ok(());
        }

        if templates.is_empty() {
            config.status("No templates installed".dimmed());
            return Ok(());
        }

        for template in &templates {
            println!("{}", format_template(template));
            for generator in &template.generators {
                let description = if generator.description.is_empty() {
                    String::new()
                } else {
                    format!(" - {}", generator.description)
                };
                println!("    {} ({}){}", generator.id.cyan(), generator.ttype, description.dimmed());
            }
        }
        Ok(())
    }
}

fn format_template(template: &Template) -> String {
    let version = template.version.as_deref().map(|v| format!(" {v}")).unwrap_or_default();
    let source = match template.source_type {
        SourceType::Url => "installed".normal(),
        SourceType::Link => "linked".yellow(),
    };
    let name = if template.name.is_empty() || template.name == template.id {
        String::new()
    } else {
        format!(" - {}", template.name)
    };
    format!("{}{} [{}]{}", template.id.bold(), version, source, name)
}
