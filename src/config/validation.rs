use super::Config;
use crate::constants::panel::MAX_REFRESH_INTERVAL_SECONDS;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API domain cannot be empty and must look like a URL or domain name
/// - Refresh interval must be positive and at most a day; rotation step must
///   be positive
/// - HTTP timeout must be positive
/// - If a log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    validate_api_domain(&config.api_domain)?;

    if config.refresh_interval_seconds == 0 {
        return Err(AppError::config_error(
            "Refresh interval must be at least 1 second",
        ));
    }

    if config.refresh_interval_seconds > MAX_REFRESH_INTERVAL_SECONDS {
        return Err(AppError::config_error(format!(
            "Refresh interval cannot exceed {MAX_REFRESH_INTERVAL_SECONDS} seconds"
        )));
    }

    if config.rotation_step == 0 {
        return Err(AppError::config_error("Rotation step must be at least 1"));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn validate_api_domain(api_domain: &str) -> Result<(), AppError> {
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://")
        && !api_domain.starts_with("https://")
        && !api_domain.contains('.')
        && !api_domain.starts_with("localhost")
    {
        return Err(AppError::config_error(
            "API domain must be a valid URL or domain name",
        ));
    }

    Ok(())
}
