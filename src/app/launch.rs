use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::audio::SoundMapper;
use crate::cli::ConfigFile;
use crate::config::Config;
use crate::input::{terminal, ActiveSource, InputSource, KeyListener};
use crate::keymap::ScanCodeTable;
use crate::models::Layout;
use crate::services::layouts::validate_layout_path;
use crate::services::LayoutService;
use crate::{logging, tui};

/// Screen the TUI opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StartMode {
    /// Layout editor
    #[default]
    Editor,
    /// Live keypress visualizer
    Visualizer,
}

/// Everything the launcher needs from the command line.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Layout file to open
    pub layout: Option<PathBuf>,
    /// Config file replacing the default one
    pub config: Option<PathBuf>,
    /// Initial mode
    pub mode: StartMode,
    /// Input source overriding the configured one
    pub source: Option<InputSource>,
    /// Debug logging
    pub verbose: bool,
}

/// Loads the layout named on the command line, or starts an empty one.
///
/// Returns the layout and the path it came from.
pub fn resolve_layout(path: Option<&PathBuf>) -> Result<(Layout, Option<PathBuf>)> {
    let Some(path) = path else {
        return Ok((Layout::new(tui::UNTITLED_LAYOUT), None));
    };
    for warning in validate_layout_path(path)? {
        tracing::warn!("{warning}");
        eprintln!("Warning: {warning}");
    }
    let layout = LayoutService::load(path)?;
    Ok((layout, Some(path.clone())))
}

fn load_config(options: &LaunchOptions) -> Result<Config> {
    let config_file = ConfigFile::resolve(options.config.as_deref())?;
    let config = config_file.load()?;
    config.validate()?;
    Ok(config)
}

/// Starts the listener and sounds, then runs the TUI until the user quits.
pub fn launch(options: &LaunchOptions) -> Result<()> {
    let config = load_config(options)?;
    let _log_guard = logging::init_tui_logging(&logging::log_dir()?, options.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let (layout, source_path) = resolve_layout(options.layout.as_ref())?;

    let table = ScanCodeTable::load()?;
    let source = options.source.unwrap_or(config.input.source);
    let listener = KeyListener::start(source, table).context("Failed to start key listener")?;
    let sounds = SoundMapper::from_config(&config)?;

    let mut state = tui::AppState::new(config, layout, source_path, listener, sounds)?;
    if let Some(reason) = state.listener.fallback_reason() {
        state.set_status(format!("Terminal input only: {reason}"));
    }

    let mut terminal = tui::setup_terminal()?;

    let releases = state.listener.source() == ActiveSource::Terminal
        && terminal::enable_release_reporting(&mut std::io::stdout());
    state.listener.set_terminal_releases(releases);
    tracing::debug!(releases, "terminal key release reporting");

    if options.mode == StartMode::Visualizer {
        if let Err(e) = state.enter_visualizer() {
            state.set_error(format!("Cannot start the visualizer: {e:#}"));
        }
    }

    // Run main TUI loop
    let result = tui::run_tui(&mut state, &mut terminal);

    if releases {
        terminal::disable_release_reporting(&mut std::io::stdout());
    }
    state.listener.stop();

    // Restore terminal
    tui::restore_terminal(terminal)?;

    result?;
    tracing::info!("exited cleanly");
    Ok(())
}
