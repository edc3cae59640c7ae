//! Builds the slot layout from the two mount-time fetches.

use super::format::describe_machine_type;
use super::rotator::AttributeRotator;
use super::slots::{DynamicPlaceholder, StaticValue};
use crate::error::AppError;
use crate::service::{DetailsService, MachineTypeRecord, MetricKind, StaticDetailsRecord};

pub const INSTANCE_NAME: &str = "instance-name";
pub const PROJECT: &str = "project";
pub const FRAMEWORK: &str = "framework";
pub const MACHINE_TYPE: &str = "machine-type";
pub const CPU: &str = "cpu";
pub const MEMORY: &str = "memory";
pub const GPU: &str = "gpu";

/// Static slots in display order: name, project, framework, machine type.
pub fn static_values(
    details: &StaticDetailsRecord,
    machine_types: &[MachineTypeRecord],
) -> Vec<StaticValue> {
    vec![
        StaticValue::new(INSTANCE_NAME, "Notebook", details.instance_name.clone()),
        StaticValue::new(PROJECT, "Project", details.project.clone()),
        StaticValue::new(FRAMEWORK, "Framework", details.framework.clone()),
        StaticValue::new(
            MACHINE_TYPE,
            "Machine type",
            describe_machine_type(&details.machine_type, machine_types),
        ),
    ]
}

/// Dynamic slots: CPU and memory always, GPU only with an accelerator attached.
pub fn dynamic_placeholders(details: &StaticDetailsRecord) -> Vec<DynamicPlaceholder> {
    let mut placeholders = vec![
        DynamicPlaceholder::new(CPU, "CPU", MetricKind::Cpu),
        DynamicPlaceholder::new(MEMORY, "Memory", MetricKind::Memory),
    ];
    if details.gpu.as_ref().is_some_and(|gpu| gpu.count > 0) {
        placeholders.push(DynamicPlaceholder::new(GPU, "GPU", MetricKind::Gpu));
    }
    placeholders
}

/// Fetches static details and the machine-type catalogue concurrently and
/// lays out the slots from them.
///
/// Either fetch failing yields [`AppError::InitialLoad`].
pub async fn load_rotator(service: &dyn DetailsService) -> Result<AttributeRotator, AppError> {
    let (details, machine_types) = tokio::try_join!(
        service.fetch_static_details(),
        service.fetch_machine_types()
    )
    .map_err(|e| {
        tracing::error!("Initial load failed: {e}");
        AppError::initial_load(&e)
    })?;

    tracing::info!(
        "Loaded instance details for {} ({})",
        details.instance_name,
        details.project
    );

    AttributeRotator::initialize(
        static_values(&details, &machine_types),
        dynamic_placeholders(&details),
    )
}
