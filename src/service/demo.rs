//! Simulated details service so the panel can run without a backend.

use super::DetailsService;
use super::models::{
    GpuDetails, MachineTypeRecord, MetricKind, StaticDetailsRecord, UtilizationSample,
};
use crate::error::AppError;
use futures::FutureExt;
use futures::future::BoxFuture;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

const GPU_NAME: &str = "Tesla K80";

/// Canned instance details with utilization that drifts between reads.
pub struct DemoDetailsService {
    rng: Mutex<SmallRng>,
    latency: Duration,
}

impl DemoDetailsService {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng(), Duration::from_millis(150))
    }

    /// Seeded variant with no simulated latency
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), Duration::ZERO)
    }

    fn with_rng(rng: SmallRng, latency: Duration) -> Self {
        Self {
            rng: Mutex::new(rng),
            latency,
        }
    }

    fn sample(&self, kind: MetricKind) -> UtilizationSample {
        let (low, high) = match kind {
            MetricKind::Cpu => (5.0, 95.0),
            MetricKind::Memory => (10.0, 40.0),
            MetricKind::Gpu => (60.0, 100.0),
        };
        let percent = match self.rng.lock() {
            Ok(mut rng) => rng.random_range(low..=high),
            Err(poisoned) => poisoned.into_inner().random_range(low..=high),
        };
        let sample = UtilizationSample::new(kind, percent);
        match kind {
            MetricKind::Gpu => sample.with_device(GPU_NAME),
            _ => sample,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for DemoDetailsService {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailsService for DemoDetailsService {
    fn fetch_static_details(&self) -> BoxFuture<'_, Result<StaticDetailsRecord, AppError>> {
        async move {
            self.simulate_latency().await;
            Ok(StaticDetailsRecord {
                instance_name: "pytorch".to_string(),
                project: "test-project".to_string(),
                zone: Some("us-west1-b".to_string()),
                framework: "PyTorch:1.4".to_string(),
                machine_type: "n1-standard-4".to_string(),
                gpu: Some(GpuDetails {
                    name: GPU_NAME.to_string(),
                    count: 1,
                }),
            })
        }
        .boxed()
    }

    fn fetch_machine_types(&self) -> BoxFuture<'_, Result<Vec<MachineTypeRecord>, AppError>> {
        async move {
            self.simulate_latency().await;
            Ok(vec![
                MachineTypeRecord {
                    name: "n1-standard-2".to_string(),
                    description: "2 vCPUs, 7.5 GB RAM".to_string(),
                },
                MachineTypeRecord {
                    name: "n1-standard-4".to_string(),
                    description: "4 vCPUs, 15 GB RAM".to_string(),
                },
                MachineTypeRecord {
                    name: "n1-highmem-8".to_string(),
                    description: "8 vCPUs, 52 GB RAM".to_string(),
                },
            ])
        }
        .boxed()
    }

    fn fetch_utilization(
        &self,
        kind: MetricKind,
    ) -> BoxFuture<'_, Result<UtilizationSample, AppError>> {
        async move {
            let sample = self.sample(kind);
            self.simulate_latency().await;
            Ok(sample)
        }
        .boxed()
    }
}
