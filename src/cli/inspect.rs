//! Inspect command: key table and routing summary.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::services::{KeyRouter, LayoutService};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show the keys of a layout and how scan codes route to them
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Path to layout file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct InspectResponse {
    name: String,
    description: String,
    key_count: usize,
    extent: Extent,
    routed: usize,
    unbound: usize,
    keys: Vec<KeyRow>,
}

#[derive(Debug, Serialize)]
struct Extent {
    width: i32,
    height: i32,
}

#[derive(Debug, Serialize)]
struct KeyRow {
    id: String,
    label: String,
    key_bind: String,
    scan_code: Option<u16>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> CliResult<()> {
        if !self.layout.is_file() {
            return Err(CliError::io(format!(
                "Layout file not found: {}",
                self.layout.display()
            )));
        }
        let layout = LayoutService::load(&self.layout)
            .map_err(|e| CliError::validation(format!("Failed to load layout: {e:#}")))?;
        let router = KeyRouter::build(&layout).map_err(|e| CliError::validation(e.to_string()))?;

        let (width, height) = layout.extent();
        let response = InspectResponse {
            name: layout.metadata.name.clone(),
            description: layout.metadata.description.clone(),
            key_count: layout.keys.len(),
            extent: Extent { width, height },
            routed: router.len(),
            unbound: layout.keys.len() - router.len(),
            keys: layout
                .keys
                .iter()
                .map(|key| KeyRow {
                    id: key.id.clone(),
                    label: key.label.clone(),
                    key_bind: key.key_bind.clone(),
                    scan_code: key.scan_code,
                    x: key.x,
                    y: key.y,
                    width: key.width,
                    height: key.height,
                })
                .collect(),
        };

        if self.json {
            return print_json(&response);
        }

        println!("{}", response.name);
        if !response.description.is_empty() {
            println!("{}", response.description);
        }
        println!(
            "{} keys, {} routed, {} unbound, extent {}x{}",
            response.key_count, response.routed, response.unbound, width, height
        );
        println!();
        println!(
            "{:<16} {:<14} {:>5}  {:>5} {:>5} {:>5} {:>5}",
            "LABEL", "KEY", "CODE", "X", "Y", "W", "H"
        );
        for key in &response.keys {
            let code = key
                .scan_code
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            println!(
                "{:<16} {:<14} {:>5}  {:>5} {:>5} {:>5} {:>5}",
                key.label, key.key_bind, code, key.x, key.y, key.width, key.height
            );
        }

        Ok(())
    }
}
