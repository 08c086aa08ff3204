//! Doctor command for environment checks.

use crate::cli::common::{CliError, CliResult, ConfigFile};
use crate::doctor::{DependencyChecker, DoctorFormatter, OutputFormat, ToolStatus};
use clap::Args;

/// Check keyboard access, audio playback and configuration
#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl DoctorArgs {
    /// Execute the doctor command
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        let checker = DependencyChecker::new();

        // A broken config is reported by its own check instead of aborting.
        let config = config_file.load().unwrap_or_default();
        let mut statuses = checker.check_all(&config);
        if config_file.is_explicit() {
            statuses[0] = checker.check_config_file(config_file.path());
        }

        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        };
        println!("{}", DoctorFormatter::with_format(format).format_results(&statuses));

        if statuses.iter().any(|s| s.status == ToolStatus::Missing) {
            Err(CliError::validation("Some checks failed"))
        } else {
            Ok(())
        }
    }
}
