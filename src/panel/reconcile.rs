//! Timer reconciliation: which poll registrations to add and which to drop.

use super::slots::SlotId;
use crate::service::MetricKind;
use std::collections::HashSet;

/// Minimal change that makes the registered set equal the wanted set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Newly visible dynamic slots, in window order
    pub arm: Vec<(SlotId, MetricKind)>,
    /// Registered slots that are no longer visible, sorted by id
    pub disarm: Vec<SlotId>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.arm.is_empty() && self.disarm.is_empty()
    }
}

/// Diffs the registered slot ids against the wanted dynamic slots.
///
/// Slots present on both sides are left alone so their timers keep their
/// phase. Duplicate wanted entries are armed once.
pub fn reconcile<'a>(
    registered: impl IntoIterator<Item = &'a SlotId>,
    wanted: &[(SlotId, MetricKind)],
) -> ReconcilePlan {
    let registered: HashSet<&SlotId> = registered.into_iter().collect();
    let wanted_ids: HashSet<&SlotId> = wanted.iter().map(|(id, _)| id).collect();

    let mut arm: Vec<(SlotId, MetricKind)> = Vec::new();
    for (id, metric) in wanted {
        if !registered.contains(id) && !arm.iter().any(|(armed, _)| armed == id) {
            arm.push((id.clone(), *metric));
        }
    }

    let mut disarm: Vec<SlotId> = registered
        .into_iter()
        .filter(|id| !wanted_ids.contains(id))
        .cloned()
        .collect();
    disarm.sort();

    ReconcilePlan { arm, disarm }
}
