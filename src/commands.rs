use crate::cli::Args;
use futures::future::join_all;
use instance_details::config::Config;
use instance_details::error::AppError;
use instance_details::panel::assembly::load_rotator;
use instance_details::panel::format::{format_sample, slot_text};
use instance_details::panel::{AttributeSlot, SlotId, SlotUpdate};
use instance_details::service::{DetailsService, MetricKind};
use std::sync::Arc;

/// Validates command line argument combinations.
///
/// Returns an error if incompatible or out-of-range arguments are used.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.new_log_file_path.is_some() && args.clear_log_file_path {
        return Err(AppError::config_error(
            "Cannot use both --set-log-file and --clear-log-file simultaneously",
        ));
    }
    if args.refresh_interval == Some(0) {
        return Err(AppError::config_error(
            "Refresh interval must be at least 1 second",
        ));
    }
    if args.rotation_step == Some(0) {
        return Err(AppError::config_error("Rotation step must be at least 1"));
    }
    Ok(())
}

/// Applies `--refresh-interval` and `--step` on top of the loaded config.
pub fn apply_arg_overrides(config: &mut Config, args: &Args) {
    if let Some(interval) = args.refresh_interval {
        config.refresh_interval_seconds = interval;
    }
    if let Some(step) = args.rotation_step {
        config.rotation_step = step;
    }
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--config, --set-log-file, --clear-log-file).
///
/// A missing or unreadable config file starts from defaults.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_else(|e| {
        tracing::warn!("Starting from default config: {e}");
        Config::default()
    });

    if let Some(new_domain) = &args.new_api_domain {
        config.api_domain = new_domain.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Handles the --once command.
///
/// Loads the same slot list the panel rotates through, fetches each
/// utilization metric a single time and prints every slot. A failed metric
/// is reported in place and does not fail the command.
pub async fn handle_once_command(service: Arc<dyn DetailsService>) -> Result<(), AppError> {
    let mut rotator = load_rotator(service.as_ref()).await?;

    let dynamic: Vec<(SlotId, MetricKind)> = rotator
        .slots()
        .iter()
        .filter_map(|slot| slot.kind.metric().map(|metric| (slot.id.clone(), metric)))
        .collect();
    let samples = join_all(
        dynamic
            .iter()
            .map(|(_, metric)| service.fetch_utilization(*metric)),
    )
    .await;

    for ((id, metric), sample) in dynamic.into_iter().zip(samples) {
        let update = match sample {
            Ok(sample) => SlotUpdate::Value(format_sample(&sample)),
            Err(e) => {
                tracing::warn!("Fetching {metric} failed: {e}");
                let error = AppError::metric_refresh(metric.label(), e.to_string());
                SlotUpdate::Error(error.to_string())
            }
        };
        rotator.update_slot_value(&id, update);
    }

    for slot in rotator.slots() {
        println!("{}", once_line(slot));
    }

    Ok(())
}

/// `Label: value` for static slots, the panel's own slot text for metrics
fn once_line(slot: &AttributeSlot) -> String {
    match (slot.is_dynamic(), slot.value.as_deref()) {
        (false, Some(value)) => format!("{}: {value}", slot.label),
        _ => slot_text(slot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use instance_details::panel::SlotStatus;
    use instance_details::testing_utils::MockDetailsService;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("instance_details").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_validate_args_rejects_zero_values() {
        assert!(validate_args(&parse(&["-r", "0"])).is_err());
        assert!(validate_args(&parse(&["--step", "0"])).is_err());
        assert!(validate_args(&parse(&["-r", "3", "--step", "2"])).is_ok());
    }

    #[test]
    fn test_validate_args_rejects_conflicting_log_flags() {
        let args = parse(&["--set-log-file", "/tmp/x.log", "--clear-log-file"]);
        assert!(matches!(validate_args(&args), Err(AppError::Config(_))));
    }

    #[test]
    fn test_apply_arg_overrides() {
        let mut config = Config::default();
        apply_arg_overrides(&mut config, &parse(&["-r", "7", "--step", "3"]));
        assert_eq!(config.refresh_interval_seconds, 7);
        assert_eq!(config.rotation_step, 3);

        let mut untouched = Config::default();
        apply_arg_overrides(&mut untouched, &parse(&[]));
        assert_eq!(untouched, Config::default());
    }

    #[tokio::test]
    async fn test_once_fetches_each_metric_once() {
        let service = Arc::new(MockDetailsService::reference());
        service.push_failure(MetricKind::Gpu, "driver not loaded");

        handle_once_command(service.clone()).await.unwrap();

        assert_eq!(service.utilization_calls(MetricKind::Cpu), 1);
        assert_eq!(service.utilization_calls(MetricKind::Memory), 1);
        assert_eq!(service.utilization_calls(MetricKind::Gpu), 1);
    }

    #[test]
    fn test_once_line_formats() {
        let project = AttributeSlot::ready(SlotId::from("project"), "Project", "test-project");
        assert_eq!(once_line(&project), "Project: test-project");

        let mut cpu = AttributeSlot::loading(SlotId::from("cpu"), "CPU", MetricKind::Cpu);
        cpu.status = SlotStatus::Error;
        assert_eq!(once_line(&cpu), "CPU unavailable");

        cpu.value = Some("CPU: 50.0%".to_string());
        cpu.status = SlotStatus::Ready;
        assert_eq!(once_line(&cpu), "CPU: 50.0%");
    }

    #[tokio::test]
    async fn test_once_fails_on_initial_load() {
        let service = Arc::new(MockDetailsService::reference().failing_static_details());
        let result = handle_once_command(service.clone()).await;
        assert!(matches!(result, Err(AppError::InitialLoad(_))));
        assert_eq!(service.total_utilization_calls(), 0);
    }
}
