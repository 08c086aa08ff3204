//! KeyViz - terminal keyboard layout editor and keypress visualizer
//!
//! Without a subcommand the TUI starts; the subcommands are headless and
//! scriptable.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use keyviz::app::{self, LaunchOptions, StartMode};
use keyviz::branding::{version_banner, APP_DESCRIPTION};
use keyviz::cli::{
    CliResult, ConfigArgs, ConfigFile, DoctorArgs, InspectArgs, KeysArgs, LayoutsArgs,
    ValidateArgs,
};
use keyviz::input::InputSource;
use keyviz::logging;

/// KeyViz - keyboard layout editor and live keypress visualizer
#[derive(Parser, Debug)]
#[command(author, version, about = APP_DESCRIPTION, long_about = None)]
struct Cli {
    /// Layout file to open (JSON, JSON5, YAML or TOML)
    #[arg(short, long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Use this config file instead of the default one
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Screen to start on
    #[arg(short, long, value_enum, default_value_t = StartMode::Editor)]
    mode: StartMode,

    /// Key event source (overrides the config)
    #[arg(short, long, value_enum)]
    source: Option<InputSource>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a layout file for errors
    Validate(ValidateArgs),
    /// Show the keys and routing of a layout
    Inspect(InspectArgs),
    /// List saved layouts
    Layouts(LayoutsArgs),
    /// Browse the scan-code table
    Keys(KeysArgs),
    /// Show or change the configuration
    Config(ConfigArgs),
    /// Check input-device access and audio players
    Doctor(DoctorArgs),
}

fn run_command(command: &Command, config: Option<&PathBuf>) -> CliResult<()> {
    let config_file = ConfigFile::resolve(config.map(PathBuf::as_path))?;
    match command {
        Command::Validate(args) => args.execute(&config_file),
        Command::Inspect(args) => args.execute(),
        Command::Layouts(args) => args.execute(&config_file),
        Command::Keys(args) => args.execute(),
        Command::Config(args) => args.execute(&config_file),
        Command::Doctor(args) => args.execute(&config_file),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        logging::init_cli_logging(cli.verbose);
        if let Err(e) = run_command(command, cli.config.as_ref()) {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
        return Ok(());
    }

    println!("{}", version_banner());

    let options = LaunchOptions {
        layout: cli.layout,
        config: cli.config,
        mode: cli.mode,
        source: cli.source,
        verbose: cli.verbose,
    };
    app::launch(&options)
}
