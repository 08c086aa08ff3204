//! Scan-code table listing.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::keymap::{ScanCodeEntry, ScanCodeTable};
use clap::Args;

/// List the key names and scan codes layouts can bind to
#[derive(Debug, Clone, Args)]
pub struct KeysArgs {
    /// Filter by name, alias or code
    #[arg(short, long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Only show one category (e.g., letters, modifiers)
    #[arg(short, long, value_name = "ID")]
    pub category: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl KeysArgs {
    /// Execute the keys command
    pub fn execute(&self) -> CliResult<()> {
        let table = ScanCodeTable::load()
            .map_err(|e| CliError::io(format!("Failed to load scan-code table: {e}")))?;

        if let Some(category) = &self.category {
            if !table.categories().iter().any(|c| &c.id == category) {
                let known: Vec<&str> = table.categories().iter().map(|c| c.id.as_str()).collect();
                return Err(CliError::validation(format!(
                    "Unknown category '{category}' (expected one of: {})",
                    known.join(", ")
                )));
            }
        }

        let entries: Vec<&ScanCodeEntry> = match &self.search {
            Some(query) => table.search(query),
            None => table.all().iter().collect(),
        }
        .into_iter()
        .filter(|entry| self.category.as_ref().map_or(true, |c| &entry.category == c))
        .collect();

        if self.json {
            return print_json(&entries);
        }

        for entry in &entries {
            if entry.aliases.is_empty() {
                println!("{:>4}  {:<18} {}", entry.code, entry.name, entry.category);
            } else {
                println!(
                    "{:>4}  {:<18} {:<11} ({})",
                    entry.code,
                    entry.name,
                    entry.category,
                    entry.aliases.join(", ")
                );
            }
        }
        if entries.is_empty() {
            println!("No matching keys");
        }
        Ok(())
    }
}
