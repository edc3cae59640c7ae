//! Records exchanged with the details service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Accelerator attached to the instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuDetails {
    pub name: String,
    #[serde(default = "default_gpu_count")]
    pub count: u32,
}

fn default_gpu_count() -> u32 {
    1
}

/// Identity and configuration of the instance, fetched once at mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticDetailsRecord {
    pub instance_name: String,
    pub project: String,
    #[serde(default)]
    pub zone: Option<String>,
    /// Framework/image label, e.g. "PyTorch:1.4"
    pub framework: String,
    /// Machine type name, resolved against the machine-type list
    pub machine_type: String,
    #[serde(default)]
    pub gpu: Option<GpuDetails>,
}

/// One entry of the machine-type catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineTypeRecord {
    pub name: String,
    /// Human readable shape, e.g. "4 vCPUs, 15 GB RAM"
    pub description: String,
}

/// Live metric categories refreshed by the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
    Gpu,
}

impl MetricKind {
    /// Display label used as the value prefix
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Cpu => "CPU",
            MetricKind::Memory => "Memory",
            MetricKind::Gpu => "GPU",
        }
    }

    /// Path segment of the utilization endpoint
    pub fn path_segment(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Gpu => "gpu",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single utilization reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSample {
    pub kind: MetricKind,
    /// Utilization in percent (0-100)
    pub percent: f64,
    /// Device name for per-device metrics (GPU)
    #[serde(default)]
    pub device: Option<String>,
}

impl UtilizationSample {
    pub fn new(kind: MetricKind, percent: f64) -> Self {
        Self {
            kind,
            percent,
            device: None,
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_details_deserialization() {
        let json = r#"{
            "instanceName": "pytorch",
            "project": "test-project",
            "zone": "us-west1-b",
            "framework": "PyTorch:1.4",
            "machineType": "n1-standard-4",
            "gpu": { "name": "Tesla K80" }
        }"#;

        let details: StaticDetailsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(details.instance_name, "pytorch");
        assert_eq!(details.machine_type, "n1-standard-4");
        assert_eq!(
            details.gpu,
            Some(GpuDetails {
                name: "Tesla K80".to_string(),
                count: 1
            })
        );
    }

    #[test]
    fn test_static_details_without_gpu() {
        let json = r#"{
            "instanceName": "cpu-only",
            "project": "test-project",
            "framework": "TensorFlow:2.1",
            "machineType": "n1-standard-8"
        }"#;

        let details: StaticDetailsRecord = serde_json::from_str(json).unwrap();
        assert!(details.gpu.is_none());
        assert!(details.zone.is_none());
    }

    #[test]
    fn test_utilization_sample_deserialization() {
        let sample: UtilizationSample =
            serde_json::from_str(r#"{"kind":"gpu","percent":100.0,"device":"Tesla K80"}"#)
                .unwrap();
        assert_eq!(sample.kind, MetricKind::Gpu);
        assert_eq!(sample.device.as_deref(), Some("Tesla K80"));
    }

    #[test]
    fn test_metric_kind_labels() {
        assert_eq!(MetricKind::Cpu.to_string(), "CPU");
        assert_eq!(MetricKind::Memory.path_segment(), "memory");
    }
}
