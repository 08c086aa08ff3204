//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult, ConfigFile};
use crate::config::Config;
use clap::{Args, Subcommand};

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print one value by dotted key (e.g. sound.volume)
    Get(ConfigGetArgs),
    /// Set one value by dotted key
    Set(ConfigSetArgs),
    /// Write a config file with every default value
    Init(ConfigInitArgs),
    /// Print the config file path
    Path,
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Print one configuration value
#[derive(Args, Debug)]
pub struct ConfigGetArgs {
    /// Dotted key, e.g. `key_colors.pressed`
    key: String,
}

/// Set one configuration value
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Dotted key, e.g. `sound.volume`
    key: String,

    /// New value; JSON literals (`true`, `0.5`, `null`) or plain text
    value: String,
}

/// Write the default configuration
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(config_file),
            ConfigCommand::Get(args) => args.execute(config_file),
            ConfigCommand::Set(args) => args.execute(config_file),
            ConfigCommand::Init(args) => args.execute(config_file),
            ConfigCommand::Path => {
                println!("{}", config_file.path().display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        let config = config_file.load()?;

        if self.json {
            print_json(&config)
        } else {
            output_human_readable(&config, config_file);
            Ok(())
        }
    }
}

impl ConfigGetArgs {
    /// Execute get command
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        let config = config_file.load()?;
        let value = config
            .get_value(&self.key)
            .map_err(|e| CliError::validation(e.to_string()))?;
        match value {
            serde_json::Value::String(s) => println!("{s}"),
            other => println!("{other}"),
        }
        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        let mut config = config_file.load_for_update()?;
        config
            .set_value(&self.key, &self.value)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        config_file.save(&config)?;

        println!("Configuration updated successfully.");
        Ok(())
    }
}

impl ConfigInitArgs {
    /// Execute init command
    pub fn execute(&self, config_file: &ConfigFile) -> CliResult<()> {
        let path = if config_file.is_explicit() {
            if config_file.path().exists() && !self.force {
                return Err(CliError::validation(format!(
                    "Config file already exists: {} (use --force to overwrite)",
                    config_file.path().display()
                )));
            }
            config_file.save(&Config::default())?;
            config_file.path().to_path_buf()
        } else {
            Config::create_default(self.force).map_err(|e| CliError::validation(format!("{e:#}")))?
        };

        println!("Wrote default configuration to {}", path.display());
        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config, config_file: &ConfigFile) {
    println!("KeyViz Configuration");
    println!("====================");
    println!("File: {}", config_file.path().display());
    println!();

    println!("UI:");
    println!("  Theme Mode:   {}", config.ui.theme_mode);
    println!("  Show Toolbar: {}", config.ui.show_toolbar);
    println!();

    println!("Sound:");
    println!("  Enabled: {}", config.sound.enabled);
    println!("  Volume:  {:.2}", config.sound.volume);
    match config.sounds_dir() {
        Ok(dir) => println!("  Clips:   {}", dir.display()),
        Err(_) => println!("  Clips:   (unknown)"),
    }
    println!(
        "  Player:  {}",
        config.sound.player.as_deref().unwrap_or("(auto-detect)")
    );
    println!();

    println!("Input:");
    println!("  Source:        {}", config.input.source);
    println!("  Release After: {} ms", config.input.release_after_ms);
    println!("  Poll Interval: {} ms", config.input.poll_interval_ms);
    println!();

    println!("Editor:");
    println!(
        "  Canvas:       {}x{}",
        config.editor.canvas_width, config.editor.canvas_height
    );
    println!(
        "  Key Size:     {} (min {})",
        config.editor.default_key_size, config.editor.min_key_size
    );
    println!();

    println!("Paths:");
    match config.layouts_dir() {
        Ok(dir) => println!("  Layouts: {}", dir.display()),
        Err(_) => println!("  Layouts: (unknown)"),
    }
    println!();
}
