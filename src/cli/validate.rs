//! Validation command for layout files.

use crate::cli::common::{print_json, CliError, CliResult, ConfigFile};
use crate::services::layouts::validate_layout_path;
use crate::services::{KeyRouter, LayoutService};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Validate a layout file for errors and warnings
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to layout file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

/// JSON result of `validate`.
#[derive(Debug, Serialize)]
struct ValidationResponse {
    valid: bool,
    key_count: usize,
    routed_keys: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        let config = config_file.load()?;

        let mut warnings = validate_layout_path(&self.layout)
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        let layout = LayoutService::load(&self.layout)
            .map_err(|e| CliError::validation(format!("Failed to load layout: {e:#}")))?;

        let report = layout.validate(config.editor.min_key_size);
        warnings.extend(report.warnings.iter().cloned());

        let routed_keys = KeyRouter::build(&layout).map_or(0, |router| router.len());

        let response = ValidationResponse {
            valid: report.is_valid(),
            key_count: layout.keys.len(),
            routed_keys,
            errors: report.errors,
            warnings,
        };

        if self.json {
            print_json(&response)?;
        } else {
            if response.valid {
                println!("✓ Validation passed");
            } else {
                println!("✗ Validation failed");
            }
            println!();
            println!("  Keys:   {}", response.key_count);
            println!("  Routed: {}", response.routed_keys);

            if !response.errors.is_empty() || !response.warnings.is_empty() {
                println!("\nIssues:");
                for error in &response.errors {
                    println!("  ✗ {error}");
                }
                for warning in &response.warnings {
                    println!("  ⚠ {warning}");
                }
            }
        }

        if !response.valid {
            return Err(CliError::validation("Validation failed"));
        }
        if self.strict && !response.warnings.is_empty() {
            return Err(CliError::validation("Warnings found in strict mode"));
        }

        Ok(())
    }
}
