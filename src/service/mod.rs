//! Transport seam between the panel and whatever serves instance data.
//!
//! - `models`: records returned by the service
//! - `http`: reqwest-backed implementation against a details API
//! - `demo`: in-process simulated implementation

pub mod demo;
pub mod http;
pub mod models;

use crate::error::AppError;
use futures::future::BoxFuture;

pub use demo::DemoDetailsService;
pub use http::HttpDetailsService;
pub use models::{GpuDetails, MachineTypeRecord, MetricKind, StaticDetailsRecord, UtilizationSample};

/// Remote calls the panel depends on.
///
/// `fetch_static_details` and `fetch_machine_types` are called once per mount;
/// `fetch_utilization` is called on metric activation and on every poll tick.
pub trait DetailsService: Send + Sync {
    fn fetch_static_details(&self) -> BoxFuture<'_, Result<StaticDetailsRecord, AppError>>;

    fn fetch_machine_types(&self) -> BoxFuture<'_, Result<Vec<MachineTypeRecord>, AppError>>;

    fn fetch_utilization(
        &self,
        kind: MetricKind,
    ) -> BoxFuture<'_, Result<UtilizationSample, AppError>>;
}
