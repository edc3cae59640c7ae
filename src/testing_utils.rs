use crate::error::AppError;
use crate::service::{
    DetailsService, GpuDetails, MachineTypeRecord, MetricKind, StaticDetailsRecord,
    UtilizationSample,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Semaphore;

/// Test utilities for creating mock records
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Static details of the reference instance: a PyTorch notebook with one Tesla K80
    pub fn reference_details() -> StaticDetailsRecord {
        StaticDetailsRecord {
            instance_name: "pytorch".to_string(),
            project: "test-project".to_string(),
            zone: Some("us-west1-b".to_string()),
            framework: "PyTorch:1.4".to_string(),
            machine_type: "n1-standard-4".to_string(),
            gpu: Some(GpuDetails {
                name: "Tesla K80".to_string(),
                count: 1,
            }),
        }
    }

    /// Same instance without an accelerator
    pub fn cpu_only_details() -> StaticDetailsRecord {
        StaticDetailsRecord {
            gpu: None,
            ..Self::reference_details()
        }
    }

    pub fn machine_types() -> Vec<MachineTypeRecord> {
        vec![
            MachineTypeRecord {
                name: "n1-standard-2".to_string(),
                description: "2 vCPUs, 7.5 GB RAM".to_string(),
            },
            MachineTypeRecord {
                name: "n1-standard-4".to_string(),
                description: "4 vCPUs, 15 GB RAM".to_string(),
            },
        ]
    }

    /// Default reading per metric: CPU 50%, Memory 16%, GPU 100% on a Tesla K80
    pub fn reference_sample(kind: MetricKind) -> UtilizationSample {
        match kind {
            MetricKind::Cpu => UtilizationSample::new(kind, 50.0),
            MetricKind::Memory => UtilizationSample::new(kind, 16.0),
            MetricKind::Gpu => UtilizationSample::new(kind, 100.0).with_device("Tesla K80"),
        }
    }
}

#[derive(Default)]
struct MockState {
    calls: HashMap<MetricKind, usize>,
    scripted: HashMap<MetricKind, VecDeque<Result<f64, String>>>,
    gates: HashMap<MetricKind, Arc<Semaphore>>,
}

/// Scriptable in-memory details service.
///
/// Utilization calls are counted per metric. Without a script each call
/// returns [`TestDataBuilder::reference_sample`]; queued results are consumed
/// first. A gated metric blocks every fetch until the test releases a permit,
/// which keeps a fetch in flight for as long as needed.
pub struct MockDetailsService {
    details: StaticDetailsRecord,
    machine_types: Vec<MachineTypeRecord>,
    fail_static_details: bool,
    fail_machine_types: bool,
    state: Mutex<MockState>,
}

impl MockDetailsService {
    pub fn new(details: StaticDetailsRecord, machine_types: Vec<MachineTypeRecord>) -> Self {
        Self {
            details,
            machine_types,
            fail_static_details: false,
            fail_machine_types: false,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Service for the reference instance
    pub fn reference() -> Self {
        Self::new(
            TestDataBuilder::reference_details(),
            TestDataBuilder::machine_types(),
        )
    }

    pub fn failing_static_details(mut self) -> Self {
        self.fail_static_details = true;
        self
    }

    pub fn failing_machine_types(mut self) -> Self {
        self.fail_machine_types = true;
        self
    }

    /// Queue a successful reading for the next call of `kind`
    pub fn push_percent(&self, kind: MetricKind, percent: f64) {
        self.state()
            .scripted
            .entry(kind)
            .or_default()
            .push_back(Ok(percent));
    }

    /// Queue a failure for the next call of `kind`
    pub fn push_failure(&self, kind: MetricKind, message: &str) {
        self.state()
            .scripted
            .entry(kind)
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Block fetches of `kind` until permits are added to the returned semaphore
    pub fn gate(&self, kind: MetricKind) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.state().gates.insert(kind, Arc::clone(&gate));
        gate
    }

    /// Remove the gate of `kind`; fetches already waiting stay blocked
    pub fn ungate(&self, kind: MetricKind) {
        self.state().gates.remove(&kind);
    }

    pub fn utilization_calls(&self, kind: MetricKind) -> usize {
        self.state().calls.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_utilization_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Count the call and pick its outcome; the guard is released before any await
    fn begin_call(
        &self,
        kind: MetricKind,
    ) -> (Option<Arc<Semaphore>>, Result<UtilizationSample, AppError>) {
        let mut state = self.state();
        *state.calls.entry(kind).or_insert(0) += 1;
        let gate = state.gates.get(&kind).cloned();
        let scripted = state
            .scripted
            .get_mut(&kind)
            .and_then(|queue| queue.pop_front());

        let result = match scripted {
            None => Ok(TestDataBuilder::reference_sample(kind)),
            Some(Ok(percent)) => {
                let mut sample = TestDataBuilder::reference_sample(kind);
                sample.percent = percent;
                Ok(sample)
            }
            Some(Err(message)) => Err(AppError::network_connection(
                format!("mock://utilization/{}", kind.path_segment()),
                message,
            )),
        };
        (gate, result)
    }
}

impl DetailsService for MockDetailsService {
    fn fetch_static_details(&self) -> BoxFuture<'_, Result<StaticDetailsRecord, AppError>> {
        let result = if self.fail_static_details {
            Err(AppError::api_service_unavailable(
                503,
                "Service Unavailable",
                "mock://details",
            ))
        } else {
            Ok(self.details.clone())
        };
        futures::future::ready(result).boxed()
    }

    fn fetch_machine_types(&self) -> BoxFuture<'_, Result<Vec<MachineTypeRecord>, AppError>> {
        let result = if self.fail_machine_types {
            Err(AppError::network_timeout("mock://machine-types"))
        } else {
            Ok(self.machine_types.clone())
        };
        futures::future::ready(result).boxed()
    }

    fn fetch_utilization(
        &self,
        kind: MetricKind,
    ) -> BoxFuture<'_, Result<UtilizationSample, AppError>> {
        let (gate, result) = self.begin_call(kind);
        async move {
            if let Some(gate) = gate
                && let Ok(permit) = gate.acquire().await
            {
                permit.forget();
            }
            result
        }
        .boxed()
    }
}
