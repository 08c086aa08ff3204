//! KeyViz Library
//!
//! Keyboard layouts drawn in the terminal: an editor for placing and
//! binding keys, a visualizer that lights them up as the physical keys are
//! pressed, and optional sound feedback.

// Module declarations
pub mod app;
pub mod audio;
pub mod branding;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod input;
pub mod keymap;
pub mod logging;
pub mod models;
pub mod services;
pub mod shortcuts;
pub mod tui;
