//! Instance Details Panel Library
//!
//! A rotating two-item panel of notebook instance attributes. Static details
//! are fetched once at mount; utilization metrics are refreshed only while
//! they are visible in the panel's window.
//!
//! # Examples
//!
//! ```rust,no_run
//! use instance_details::{AppError, Panel, PanelConfig};
//! use instance_details::service::{DemoDetailsService, DetailsService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let service: Arc<dyn DetailsService> = Arc::new(DemoDetailsService::new());
//!     let mut panel = Panel::mount(service, PanelConfig::default()).await?;
//!
//!     // Rotate until the CPU and memory gauges are visible
//!     for _ in 0..4 {
//!         panel.advance();
//!     }
//!
//!     // Apply fetch results as they arrive
//!     while let Some(event) = panel.next_event().await {
//!         if panel.handle_event(event) {
//!             let window = panel.current_window();
//!             println!("{:?} | {:?}", window.first.value, window.second.value);
//!             break;
//!         }
//!     }
//!
//!     panel.dispose();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod panel;
pub mod service;
pub mod testing_utils;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use panel::{AttributeSlot, DisplayWindow, Panel, PanelConfig, SlotId, SlotStatus};
pub use service::{DetailsService, MetricKind, UtilizationSample};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
