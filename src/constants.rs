//! Application-wide constants and configuration values
//!
//! This module centralizes magic numbers so the panel, the service layer and
//! the terminal host agree on defaults.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Panel rotation and refresh defaults
pub mod panel {
    /// Cursor positions moved per advance signal
    pub const DEFAULT_ROTATION_STEP: usize = 1;

    /// Period of the recurring utilization refresh while a metric is visible
    pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 3;

    /// Longest accepted refresh period
    pub const MAX_REFRESH_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

    /// Shortest refresh period a panel will run with
    pub const MIN_REFRESH_INTERVAL_MILLIS: u64 = 100;
}

/// Terminal input polling intervals in milliseconds
pub mod polling {
    /// Polling interval for active use (< 5 seconds idle)
    pub const ACTIVE_MS: u64 = 50;

    /// Polling interval for semi-active use (5-30 seconds idle)
    pub const SEMI_ACTIVE_MS: u64 = 200;

    /// Polling interval for idle use (> 30 seconds idle)
    pub const IDLE_MS: u64 = 500;

    /// Threshold for considering user as idle (seconds)
    pub const IDLE_THRESHOLD_SECONDS: u64 = 30;

    /// Threshold for considering user as semi-active (seconds)
    pub const SEMI_ACTIVE_THRESHOLD_SECONDS: u64 = 5;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API domain override
    pub const API_DOMAIN: &str = "INSTANCE_DETAILS_API_DOMAIN";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "INSTANCE_DETAILS_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "INSTANCE_DETAILS_HTTP_TIMEOUT";

    /// Environment variable for refresh interval override in seconds
    pub const REFRESH_INTERVAL: &str = "INSTANCE_DETAILS_REFRESH_INTERVAL";
}
