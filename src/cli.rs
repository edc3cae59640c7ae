use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Determines if the application should run in non-interactive mode
/// Non-interactive mode is used when any of these conditions are met:
/// - --once flag is set (print every attribute and exit)
/// - config operations are requested
pub fn is_noninteractive_mode(args: &Args) -> bool {
    args.once
        || args.new_api_domain.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
        || args.list_config
}

/// True when the arguments ask for a config change rather than a panel
pub fn is_config_update(args: &Args) -> bool {
    args.new_api_domain.is_some() || args.new_log_file_path.is_some() || args.clear_log_file_path
}

/// Notebook instance details panel
///
/// Shows two adjacent instance attributes at a time: notebook name, project,
/// framework, machine type and live CPU, memory and GPU utilization.
/// Utilization is refreshed only while it is on screen.
///
/// In interactive mode (default):
/// - Press space, enter, → or n, or click, to show the next attributes
/// - Press 'q' or Esc to quit
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
#[command(styles = get_styles())]
pub struct Args {
    /// Print every attribute once and exit. Utilization is fetched a single time.
    #[arg(short, long)]
    pub once: bool,

    /// Use the built-in demo service instead of the configured details API.
    #[arg(long = "demo", help_heading = "Display Options")]
    pub demo: bool,

    /// Seconds between utilization refreshes while a metric is visible.
    #[arg(long = "refresh-interval", short = 'r', help_heading = "Display Options")]
    pub refresh_interval: Option<u64>,

    /// Number of positions the panel moves per advance.
    #[arg(long = "step", short = 's', help_heading = "Display Options")]
    pub rotation_step: Option<usize>,

    /// Update the details API domain in config.
    #[arg(long = "config", help_heading = "Configuration", value_name = "API_DOMAIN")]
    pub new_api_domain: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug mode which doesn't switch the terminal to the alternate screen.
    /// Logs are written to stdout as well as the log file.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
