//! Text for slot values and for the slots themselves.

use super::slots::{AttributeSlot, SlotStatus};
use crate::service::{MachineTypeRecord, MetricKind, UtilizationSample};

/// Percent with one decimal, clamped to 0-100
pub fn format_percent(percent: f64) -> String {
    let clamped = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!("{clamped:.1}%")
}

/// Display value for a utilization reading, e.g. `CPU: 50.0%` or
/// `GPU: Tesla K80 - 100.0%`
pub fn format_sample(sample: &UtilizationSample) -> String {
    let percent = format_percent(sample.percent);
    match (sample.kind, sample.device.as_deref()) {
        (MetricKind::Gpu, Some(device)) if !device.is_empty() => {
            format!("{}: {device} - {percent}", sample.kind.label())
        }
        _ => format!("{}: {percent}", sample.kind.label()),
    }
}

/// Resolves the machine type name against the catalogue, falling back to the
/// raw name when it is not listed.
pub fn describe_machine_type(machine_type: &str, catalogue: &[MachineTypeRecord]) -> String {
    catalogue
        .iter()
        .find(|record| record.name == machine_type)
        .map(|record| record.description.clone())
        .unwrap_or_else(|| machine_type.to_string())
}

/// Text shown for a slot in the panel
pub fn slot_text(slot: &AttributeSlot) -> String {
    match (slot.status, slot.value.as_deref()) {
        (SlotStatus::Ready, Some(value)) => value.to_string(),
        (SlotStatus::Error, Some(value)) => format!("{value} (stale)"),
        (SlotStatus::Error, None) => format!("{} unavailable", slot.label),
        (SlotStatus::Loading, _) | (SlotStatus::Ready, None) => {
            format!("Loading {}...", slot.label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::rotator::AttributeRotator;
    use crate::panel::slots::{DynamicPlaceholder, SlotId, SlotUpdate};

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(50.0), "50.0%");
        assert_eq!(format_percent(16.04), "16.0%");
        assert_eq!(format_percent(100.0), "100.0%");
        assert_eq!(format_percent(120.5), "100.0%");
        assert_eq!(format_percent(-3.0), "0.0%");
        assert_eq!(format_percent(f64::NAN), "0.0%");
    }

    #[test]
    fn test_format_sample() {
        assert_eq!(
            format_sample(&UtilizationSample::new(MetricKind::Cpu, 50.0)),
            "CPU: 50.0%"
        );
        assert_eq!(
            format_sample(&UtilizationSample::new(MetricKind::Memory, 16.0)),
            "Memory: 16.0%"
        );
        assert_eq!(
            format_sample(&UtilizationSample::new(MetricKind::Gpu, 100.0).with_device("Tesla K80")),
            "GPU: Tesla K80 - 100.0%"
        );
        assert_eq!(
            format_sample(&UtilizationSample::new(MetricKind::Gpu, 12.3)),
            "GPU: 12.3%"
        );
    }

    #[test]
    fn test_describe_machine_type() {
        let catalogue = vec![MachineTypeRecord {
            name: "n1-standard-4".to_string(),
            description: "4 vCPUs, 15 GB RAM".to_string(),
        }];
        assert_eq!(
            describe_machine_type("n1-standard-4", &catalogue),
            "4 vCPUs, 15 GB RAM"
        );
        assert_eq!(describe_machine_type("custom-6", &catalogue), "custom-6");
    }

    #[test]
    fn test_slot_text_by_status() {
        let mut rotator = AttributeRotator::initialize(
            vec![],
            vec![DynamicPlaceholder::new("cpu", "CPU", MetricKind::Cpu)],
        )
        .unwrap();
        let cpu = SlotId::from("cpu");
        assert_eq!(slot_text(&rotator.slots()[0]), "Loading CPU...");

        rotator.update_slot_value(&cpu, SlotUpdate::Error("timeout".into()));
        assert_eq!(slot_text(&rotator.slots()[0]), "CPU unavailable");

        rotator.update_slot_value(&cpu, SlotUpdate::Value("CPU: 50.0%".into()));
        assert_eq!(slot_text(&rotator.slots()[0]), "CPU: 50.0%");

        rotator.update_slot_value(&cpu, SlotUpdate::Error("timeout".into()));
        assert_eq!(slot_text(&rotator.slots()[0]), "CPU: 50.0% (stale)");
    }
}
