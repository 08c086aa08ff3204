//! Lists saved layouts.

use crate::cli::common::{print_json, CliError, CliResult, ConfigFile};
use crate::services::LayoutService;
use clap::Args;
use std::path::PathBuf;

/// List layouts in the layouts directory
#[derive(Debug, Clone, Args)]
pub struct LayoutsArgs {
    /// Directory to list instead of the configured one
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl LayoutsArgs {
    /// Execute the layouts command
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => config_file
                .load()?
                .layouts_dir()
                .map_err(|e| CliError::io(format!("{e:#}")))?,
        };

        let layouts = LayoutService::list_layouts(&dir)
            .map_err(|e| CliError::io(format!("Failed to list layouts: {e:#}")))?;

        if self.json {
            return print_json(&layouts);
        }

        if layouts.is_empty() {
            println!("No layouts in {}", dir.display());
            return Ok(());
        }

        println!("Layouts in {}:", dir.display());
        for info in &layouts {
            println!(
                "  {:<24} {:>4} keys  {}  {}",
                info.name,
                info.key_count,
                info.modified.format("%Y-%m-%d %H:%M"),
                info.path.display()
            );
        }
        Ok(())
    }
}
