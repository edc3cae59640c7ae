//! Instance details panel
//!
//! This module is organized into focused submodules:
//! - `slots`: slot, window and update types
//! - `rotator`: ordered slot list and cyclic cursor
//! - `reconcile`: pure diff between armed timers and visible dynamic slots
//! - `poller`: visibility-driven refresh timers and fetches
//! - `assembly`: slot layout built from the mount-time fetches
//! - `format`: value and slot text
//! - `core`: the mounted panel and its event queue

pub mod assembly;
mod core;
pub mod format;
mod poller;
pub mod reconcile;
mod rotator;
pub mod slots;

pub use self::core::{Panel, PanelConfig};
pub use poller::{AdaptivePoller, FetchCompletion, PanelEvent};
pub use rotator::AttributeRotator;
pub use slots::{
    AttributeSlot, DisplayWindow, DynamicPlaceholder, SlotId, SlotKind, SlotStatus, SlotUpdate,
    StaticValue,
};
