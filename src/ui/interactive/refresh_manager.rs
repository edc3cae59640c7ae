//! Input polling cadence for the interactive loop.
//!
//! Refreshing the panel's metrics is owned by the panel itself; this only
//! decides how long the loop blocks waiting for terminal input, which bounds
//! how quickly a finished fetch reaches the screen.

use crate::constants::polling::{
    ACTIVE_MS, IDLE_MS, IDLE_THRESHOLD_SECONDS, SEMI_ACTIVE_MS, SEMI_ACTIVE_THRESHOLD_SECONDS,
};
use std::time::Duration;

/// Calculate adaptive polling interval based on user activity
pub(super) fn calculate_poll_interval(time_since_activity: Duration) -> Duration {
    if time_since_activity < Duration::from_secs(SEMI_ACTIVE_THRESHOLD_SECONDS) {
        Duration::from_millis(ACTIVE_MS)
    } else if time_since_activity < Duration::from_secs(IDLE_THRESHOLD_SECONDS) {
        Duration::from_millis(SEMI_ACTIVE_MS)
    } else {
        Duration::from_millis(IDLE_MS)
    }
}
