//! `ironman generate <template:generator> <path>`
//!
//! Values come from an optional `--values` file (JSON, or YAML when the
//! extension says so) overlaid with `--set key=value` pairs. A `--set` value
//! that parses as JSON keeps its type (`port=8080`, `flag=true`,
//! `tags=["a","b"]`); anything else is a string.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::CliConfig;
use crate::core::IronmanError;
use crate::ironman::Ironman;
use crate::model::Values;
use crate::utils::platform::resolve_path;

/// `template:generator` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRef {
    pub template: String,
    pub generator: String,
}

fn parse_generator_ref(raw: &str) -> Result<GeneratorRef, String> {
    match raw.split_once(':') {
        Some((template, generator)) if !template.is_empty() && !generator.is_empty() => Ok(GeneratorRef {
            template: template.to_string(),
            generator: generator.to_string(),
        }),
        _ => Err(format!("expected <template>:<generator>, got '{raw}'")),
    }
}

fn parse_set(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw.split_once('=').ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[derive(Args)]
pub struct GenerateCommand {
    /// Generator to run, as `<template>:<generator>`
    #[arg(value_parser = parse_generator_ref)]
    generator: GeneratorRef,

    /// Output directory, or output file for file generators
    path: String,

    /// Set a value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set)]
    set: Vec<(String, serde_json::Value)>,

    /// Read values from a JSON or YAML file
    #[arg(long, value_name = "FILE")]
    values: Option<String>,

    /// Write into a non-empty directory or over an existing file
    #[arg(long)]
    force: bool,
}

impl GenerateCommand {
    pub async fn execute(self, ironman: &Ironman, config: CliConfig) -> Result<()> {
        let mut values = match &self.values {
            Some(file) => load_values(&resolve_path(file)?)?,
            None => Values::new(),
        };
        values.extend(self.set);

        let path = resolve_path(&self.path)?;
        let report = ironman
            .generate(&self.generator.template, &self.generator.generator, &path, &values, self.force)
            .await?;

        config.status(format!(
            "{} Generated {} file(s) from {}:{} into {}",
            "✓".green(),
            report.files.len(),
            self.generator.template.bold(),
            self.generator.generator.bold(),
            path.display()
        ));
        Ok(())
    }
}

/// Read a values mapping from `path`.
fn load_values(path: &Path) -> Result<Values> {
    let content = std::fs::read_to_string(path).map_err(|e| IronmanError::from_io("read values file", path, &e))?;

    let is_yaml = path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "yaml" || e == "yml");
    let parsed = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| {
        IronmanError::ConfigError {
            file: path.display().to_string(),
            reason,
        }
        .into()
    })
}
