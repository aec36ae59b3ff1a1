//! Attributes command - list every flat attribute of a manifest

use anyhow::{Context, Result};
use psmanifest_core::{AttributeMap, Confidence, Config};
use serde::Serialize;

use super::open_module;
use crate::cli::app::{AttributesArgs, OutputFormat};

/// JSON shape of the attributes listing
#[derive(Debug, Serialize)]
struct AttributesReport<'a> {
    name: &'a str,
    path: String,
    encoding: &'static str,
    confidence: Confidence,
    attributes: &'a AttributeMap,
}

/// Execute the attributes command
pub fn execute(args: &AttributesArgs, config: &Config) -> Result<()> {
    println!("{}", render(args, config)?);
    Ok(())
}

fn render(args: &AttributesArgs, config: &Config) -> Result<String> {
    let module = open_module(&args.module, config)?;
    let attributes = module.attributes()?;

    match args.format {
        OutputFormat::Text => {
            let width = attributes.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            let lines: Vec<String> = attributes
                .iter()
                .map(|(key, value)| format!("{:<width$} = {}", key, value, width = width))
                .collect();
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            let detection = module.detection()?;
            let report = AttributesReport {
                name: module.name(),
                path: module.path().display().to_string(),
                encoding: detection.label(),
                confidence: detection.confidence,
                attributes,
            };
            serde_json::to_string_pretty(&report).context("Failed to serialize attributes")
        }
    }
}
