use super::input_handler::{PanelAction, map_event};
use super::refresh_manager::calculate_poll_interval;
use super::terminal_manager::{TerminalConfig, TerminalManager};
use crate::error::AppError;
use crate::panel::{Panel, PanelConfig};
use crate::service::DetailsService;
use crate::ui::render::{draw_load_error, draw_panel, format_window_line};
use crossterm::event;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Instant;

/// Runs the interactive panel until the user quits.
///
/// The panel is mounted inside the terminal session so a failed initial load
/// is shown as an error screen; the error is still returned once the user
/// quits. The panel is disposed before the terminal is restored.
pub async fn run_interactive_ui(
    service: Arc<dyn DetailsService>,
    config: PanelConfig,
    debug_mode: bool,
) -> Result<(), AppError> {
    let terminal = TerminalManager::with_config(TerminalConfig { debug_mode });
    let mut stdout = terminal.setup_terminal()?;

    let result = match Panel::mount(service, config).await {
        Ok(mut panel) => {
            let result = run_panel_loop(&mut panel, &mut stdout).await;
            panel.dispose();
            result
        }
        Err(e) => show_load_error(&mut stdout, &e).and(Err(e)),
    };

    terminal.cleanup_terminal(stdout)?;
    result
}

async fn run_panel_loop(panel: &mut Panel, stdout: &mut Stdout) -> Result<(), AppError> {
    let mut last_activity = Instant::now();
    let mut needs_render = true;

    loop {
        if panel.drain_events() {
            needs_render = true;
        }

        if needs_render {
            draw_panel(stdout, &panel.current_window(), panel.slots().len())?;
            needs_render = false;
        }

        let poll_interval = calculate_poll_interval(last_activity.elapsed());
        if !event::poll(poll_interval)? {
            // Let fetch tasks post their results before the next drain
            tokio::task::yield_now().await;
            continue;
        }

        last_activity = Instant::now();
        match map_event(&event::read()?) {
            PanelAction::Advance => {
                let window = panel.advance();
                tracing::debug!(
                    "Advanced to {}: {}",
                    window.cursor,
                    format_window_line(&window)
                );
                needs_render = true;
            }
            PanelAction::Quit => {
                tracing::info!("Exit requested");
                break;
            }
            PanelAction::Redraw => needs_render = true,
            PanelAction::None => {}
        }
    }

    Ok(())
}

/// Shows the load failure and blocks until the user quits
fn show_load_error(stdout: &mut Stdout, error: &AppError) -> Result<(), AppError> {
    draw_load_error(stdout, &error.to_string())?;
    loop {
        match map_event(&event::read()?) {
            PanelAction::Quit => return Ok(()),
            PanelAction::Redraw => draw_load_error(stdout, &error.to_string())?,
            PanelAction::Advance | PanelAction::None => {}
        }
    }
}
