// src/main.rs
mod app;
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Args, is_config_update};
use instance_details::config::Config;
use instance_details::error::AppError;
use instance_details::panel::PanelConfig;
use instance_details::service::{DemoDetailsService, DetailsService, HttpDetailsService};
use std::sync::Arc;

/// Picks the demo service or the HTTP service for the configured domain
fn build_service(args: &Args, config: &Config) -> Result<Arc<dyn DetailsService>, AppError> {
    if args.demo {
        tracing::info!("Using demo details service");
        Ok(Arc::new(DemoDetailsService::new()))
    } else {
        tracing::info!("Using details API at {}", config.api_domain);
        Ok(Arc::new(HttpDetailsService::from_config(config)?))
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    commands::validate_args(&args)?;

    let (log_file_path, _guard) = logging::setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if args.list_config {
        return commands::handle_list_config_command().await;
    }

    if is_config_update(&args) {
        return commands::handle_config_update_command(&args).await;
    }

    let mut config = Config::load().await?;
    commands::apply_arg_overrides(&mut config, &args);
    config.validate()?;

    let service = build_service(&args, &config)?;

    if args.once {
        return commands::handle_once_command(service).await;
    }

    app::run_interactive(&args, service, PanelConfig::from(&config)).await
}
