use crate::cli::Args;
use crossterm::{execute, terminal::SetTitle};
use instance_details::error::AppError;
use instance_details::panel::PanelConfig;
use instance_details::service::DetailsService;
use instance_details::ui;
use std::io::stdout;
use std::sync::Arc;

/// Run the interactive application flow.
///
/// Terminal setup, the panel loop and cleanup are handled by the UI host;
/// this only sets the window title and hands over the service.
pub async fn run_interactive(
    args: &Args,
    service: Arc<dyn DetailsService>,
    panel_config: PanelConfig,
) -> Result<(), AppError> {
    execute!(stdout(), SetTitle("Instance details"))?;

    tracing::info!(
        "Starting interactive panel (refresh every {:?}, step {})",
        panel_config.refresh_interval,
        panel_config.rotation_step
    );

    ui::run_interactive_ui(service, panel_config, args.debug).await
}
