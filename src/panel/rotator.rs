//! Ordered attribute slots and the cyclic cursor over them.

use super::slots::{
    AttributeSlot, DisplayWindow, DynamicPlaceholder, SlotId, SlotStatus, SlotUpdate, StaticValue,
};
use crate::constants::panel::DEFAULT_ROTATION_STEP;
use crate::error::AppError;
use chrono::Local;
use std::collections::HashSet;

/// Holds the slot list and decides which adjacent pair is visible.
///
/// The cursor always satisfies `cursor < slots.len()`; the window is
/// `(cursor, cursor + 1)` modulo the slot count, so the last and the first
/// slot are adjacent.
#[derive(Debug, Clone)]
pub struct AttributeRotator {
    slots: Vec<AttributeSlot>,
    cursor: usize,
    step: usize,
}

impl AttributeRotator {
    /// Builds the slot list: static values first, in the given order, then the
    /// dynamic placeholders in `Loading` state.
    ///
    /// Fails when there are no slots at all or when two slots share an id.
    pub fn initialize(
        static_values: Vec<StaticValue>,
        dynamic_placeholders: Vec<DynamicPlaceholder>,
    ) -> Result<Self, AppError> {
        let slots: Vec<AttributeSlot> = static_values
            .into_iter()
            .map(|value| AttributeSlot::ready(value.id, value.label, value.value))
            .chain(
                dynamic_placeholders
                    .into_iter()
                    .map(|placeholder| {
                        AttributeSlot::loading(placeholder.id, placeholder.label, placeholder.metric)
                    }),
            )
            .collect();

        if slots.is_empty() {
            return Err(AppError::config_error("Panel needs at least one attribute slot"));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = slots.iter().find(|slot| !seen.insert(&slot.id)) {
            return Err(AppError::config_error(format!(
                "Duplicate attribute slot id: {}",
                duplicate.id
            )));
        }

        Ok(Self {
            slots,
            cursor: 0,
            step: DEFAULT_ROTATION_STEP,
        })
    }

    /// Sets how many positions one advance moves; zero is treated as one.
    pub fn with_rotation_step(mut self, step: usize) -> Self {
        self.step = step.max(1);
        self
    }

    pub fn rotation_step(&self) -> usize {
        self.step
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[AttributeSlot] {
        &self.slots
    }

    pub fn slot(&self, id: &SlotId) -> Option<&AttributeSlot> {
        self.slots.iter().find(|slot| &slot.id == id)
    }

    /// Moves the cursor forward by the rotation step, wrapping at the end.
    pub fn advance(&mut self) -> DisplayWindow {
        let len = self.slots.len();
        // Both terms are below `len`, so the sum cannot overflow
        self.cursor = (self.cursor + self.step % len) % len;
        tracing::debug!(cursor = self.cursor, "Advanced attribute rotation");
        self.current_window()
    }

    pub fn current_window(&self) -> DisplayWindow {
        let len = self.slots.len();
        DisplayWindow {
            cursor: self.cursor,
            first: self.slots[self.cursor].clone(),
            second: self.slots[(self.cursor + 1) % len].clone(),
        }
    }

    /// Applies a refresh outcome to a dynamic slot.
    ///
    /// Returns `false` without touching anything when the slot is unknown or
    /// static. An error keeps the previous value and only flips the status.
    pub fn update_slot_value(&mut self, id: &SlotId, update: SlotUpdate) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|slot| &slot.id == id) else {
            tracing::debug!("Ignoring update for unknown slot {id}");
            return false;
        };

        if !slot.is_dynamic() {
            tracing::debug!("Ignoring update for static slot {id}");
            return false;
        }

        match update {
            SlotUpdate::Value(value) => {
                slot.value = Some(value);
                slot.status = SlotStatus::Ready;
                slot.last_error = None;
                slot.updated_at = Some(Local::now());
            }
            SlotUpdate::Error(message) => {
                slot.status = SlotStatus::Error;
                slot.last_error = Some(message);
            }
        }

        true
    }
}
