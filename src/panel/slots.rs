//! Slot and window types shared by the rotator and the poller.

use crate::service::MetricKind;
use chrono::{DateTime, Local};
use std::fmt;

/// Stable identifier of an attribute slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Whether a slot is fetched once or refreshed while visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Static,
    Dynamic(MetricKind),
}

impl SlotKind {
    pub fn metric(self) -> Option<MetricKind> {
        match self {
            SlotKind::Static => None,
            SlotKind::Dynamic(metric) => Some(metric),
        }
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, SlotKind::Dynamic(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Loading,
    Ready,
    Error,
}

/// One attribute entry in the rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSlot {
    pub id: SlotId,
    pub kind: SlotKind,
    pub label: String,
    pub value: Option<String>,
    pub status: SlotStatus,
    /// Message of the most recent failed refresh, cleared on success
    pub last_error: Option<String>,
    /// Time of the most recent successful refresh
    pub updated_at: Option<DateTime<Local>>,
}

impl AttributeSlot {
    /// A ready slot holding an already-resolved value
    pub fn ready(id: SlotId, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            kind: SlotKind::Static,
            label: label.into(),
            value: Some(value.into()),
            status: SlotStatus::Ready,
            last_error: None,
            updated_at: None,
        }
    }

    /// A dynamic slot waiting for its first refresh
    pub fn loading(id: SlotId, label: impl Into<String>, metric: MetricKind) -> Self {
        Self {
            id,
            kind: SlotKind::Dynamic(metric),
            label: label.into(),
            value: None,
            status: SlotStatus::Loading,
            last_error: None,
            updated_at: None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind.is_dynamic()
    }
}

/// Resolved value for a static slot
#[derive(Debug, Clone, PartialEq)]
pub struct StaticValue {
    pub id: SlotId,
    pub label: String,
    pub value: String,
}

impl StaticValue {
    pub fn new(id: impl Into<SlotId>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Declaration of a dynamic slot and the metric that feeds it
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicPlaceholder {
    pub id: SlotId,
    pub label: String,
    pub metric: MetricKind,
}

impl DynamicPlaceholder {
    pub fn new(id: impl Into<SlotId>, label: impl Into<String>, metric: MetricKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            metric,
        }
    }
}

/// Outcome of a refresh applied to a dynamic slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotUpdate {
    Value(String),
    Error(String),
}

/// The visible pair of adjacent slots; `first` is at the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayWindow {
    pub cursor: usize,
    pub first: AttributeSlot,
    pub second: AttributeSlot,
}

impl DisplayWindow {
    /// Slots in display order, without repeating a slot that fills both positions
    pub fn slots(&self) -> impl Iterator<Item = &AttributeSlot> {
        let second = (self.second.id != self.first.id).then_some(&self.second);
        std::iter::once(&self.first).chain(second)
    }

    /// Dynamic slots in the window with the metric each one needs
    pub fn dynamic_metrics(&self) -> Vec<(SlotId, MetricKind)> {
        self.slots()
            .filter_map(|slot| slot.kind.metric().map(|metric| (slot.id.clone(), metric)))
            .collect()
    }

    pub fn contains(&self, id: &SlotId) -> bool {
        self.slots().any(|slot| &slot.id == id)
    }
}
