//! Interactive terminal host for the details panel
//!
//! This module is organized into focused submodules:
//! - `input_handler`: keyboard and mouse events to panel actions
//! - `refresh_manager`: adaptive input polling cadence
//! - `terminal_manager`: raw mode, alternate screen and mouse capture
//! - `core`: main interactive loop

mod core;
mod input_handler;
mod refresh_manager;
mod terminal_manager;

pub use self::core::run_interactive_ui;
pub use terminal_manager::{TerminalConfig, TerminalManager};
