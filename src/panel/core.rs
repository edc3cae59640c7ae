//! The mounted panel: rotator, poller and the event queue between them.
//!
//! All state transitions happen through `&mut Panel`, so advancing, timer
//! ticks and fetch completions are applied one at a time by whichever task
//! owns the panel. Background tasks only ever post events.

use super::assembly::load_rotator;
use super::poller::{AdaptivePoller, PanelEvent, bounded_period};
use super::rotator::AttributeRotator;
use super::slots::{AttributeSlot, DisplayWindow, SlotId};
use crate::config::Config;
use crate::constants::panel::{DEFAULT_REFRESH_INTERVAL_SECONDS, DEFAULT_ROTATION_STEP};
use crate::error::AppError;
use crate::service::DetailsService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Rotation and refresh tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub refresh_interval: Duration,
    pub rotation_step: usize,
}

impl PanelConfig {
    /// The refresh interval is clamped to the range a timer can run with and a
    /// zero step is raised to one.
    pub fn new(refresh_interval: Duration, rotation_step: usize) -> Self {
        Self {
            refresh_interval: bounded_period(refresh_interval),
            rotation_step: rotation_step.max(1),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECONDS),
            DEFAULT_ROTATION_STEP,
        )
    }
}

impl From<&Config> for PanelConfig {
    fn from(config: &Config) -> Self {
        Self::new(config.refresh_interval(), config.rotation_step)
    }
}

pub struct Panel {
    rotator: AttributeRotator,
    poller: AdaptivePoller,
    events: UnboundedReceiver<PanelEvent>,
}

impl Panel {
    /// Fetches static details and the machine-type catalogue concurrently and
    /// builds the panel from them.
    ///
    /// Either fetch failing yields [`AppError::InitialLoad`]; the caller shows
    /// a panel-level error instead of the attributes.
    pub async fn mount(
        service: Arc<dyn DetailsService>,
        config: PanelConfig,
    ) -> Result<Self, AppError> {
        let rotator = load_rotator(service.as_ref())
            .await?
            .with_rotation_step(config.rotation_step);
        tracing::info!("Mounted details panel with {} slots", rotator.len());

        Ok(Self::new(rotator, service, config.refresh_interval))
    }

    /// Wires an already-built rotator to a poller. Must run inside a tokio
    /// runtime: a dynamic slot in the initial window is armed right away.
    pub fn new(
        rotator: AttributeRotator,
        service: Arc<dyn DetailsService>,
        refresh_interval: Duration,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let mut poller = AdaptivePoller::new(service, tx, refresh_interval);
        poller.on_window_changed(&rotator.current_window());

        Self {
            rotator,
            poller,
            events: rx,
        }
    }

    pub fn current_window(&self) -> DisplayWindow {
        self.rotator.current_window()
    }

    /// Moves to the next window and reconciles refresh timers with it.
    /// After dispose the window no longer moves.
    pub fn advance(&mut self) -> DisplayWindow {
        if self.poller.is_disposed() {
            return self.rotator.current_window();
        }
        let window = self.rotator.advance();
        self.poller.on_window_changed(&window);
        window
    }

    /// Stops all refreshing. Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.poller.is_disposed() {
            tracing::info!("Disposing details panel");
        }
        self.poller.dispose();
        self.events.close();
    }

    pub fn is_disposed(&self) -> bool {
        self.poller.is_disposed()
    }

    pub fn slots(&self) -> &[AttributeSlot] {
        self.rotator.slots()
    }

    pub fn slot(&self, id: &SlotId) -> Option<&AttributeSlot> {
        self.rotator.slot(id)
    }

    /// Dynamic slots with an armed refresh timer, sorted by id
    pub fn active_registrations(&self) -> Vec<SlotId> {
        self.poller.registered_ids()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.poller.period()
    }

    /// Waits for the next queued event. Returns `None` after dispose once the
    /// queue is drained.
    pub async fn next_event(&mut self) -> Option<PanelEvent> {
        self.events.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<PanelEvent> {
        self.events.try_recv().ok()
    }

    /// Applies one event. Returns whether any slot changed.
    pub fn handle_event(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::Tick { slot, generation } => {
                self.poller.on_tick(&slot, generation);
                false
            }
            PanelEvent::FetchCompleted(completion) => {
                self.poller.on_fetch_completed(&mut self.rotator, completion)
            }
        }
    }

    /// Applies every event queued so far. Returns whether any slot changed.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.try_next_event() {
            changed |= self.handle_event(event);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::assembly::{CPU, MEMORY};
    use crate::panel::slots::{DynamicPlaceholder, SlotStatus, StaticValue};
    use crate::service::MetricKind;
    use crate::testing_utils::MockDetailsService;

    #[tokio::test]
    async fn test_mount_builds_reference_layout() {
        let service = Arc::new(MockDetailsService::reference());
        let panel = Panel::mount(service.clone(), PanelConfig::default())
            .await
            .unwrap();

        assert_eq!(panel.slots().len(), 7);
        let window = panel.current_window();
        assert_eq!(window.first.value.as_deref(), Some("pytorch"));
        assert_eq!(window.second.value.as_deref(), Some("test-project"));
        assert!(panel.active_registrations().is_empty());
        assert_eq!(service.total_utilization_calls(), 0);
    }

    #[tokio::test]
    async fn test_mount_failure_is_initial_load_error() {
        let service = Arc::new(MockDetailsService::reference().failing_static_details());
        let result = Panel::mount(service, PanelConfig::default()).await;
        assert!(matches!(result, Err(AppError::InitialLoad(_))));

        let service = Arc::new(MockDetailsService::reference().failing_machine_types());
        let result = Panel::mount(service, PanelConfig::default()).await;
        assert!(matches!(result, Err(AppError::InitialLoad(_))));
    }

    #[tokio::test]
    async fn test_mount_applies_rotation_step() {
        let service = Arc::new(MockDetailsService::reference());
        let mut panel = Panel::mount(service, PanelConfig::new(Duration::from_secs(3), 2))
            .await
            .unwrap();

        assert_eq!(panel.advance().cursor, 2);
        let window = panel.advance();
        assert_eq!(window.cursor, 4);
        assert_eq!(
            panel.active_registrations(),
            vec![SlotId::from(CPU), SlotId::from(MEMORY)]
        );
    }

    #[test]
    fn test_panel_config_bounds() {
        let config = PanelConfig::new(Duration::ZERO, 0);
        assert!(config.refresh_interval > Duration::ZERO);
        assert_eq!(config.rotation_step, 1);

        let config = PanelConfig::new(Duration::from_secs(u64::MAX), usize::MAX);
        assert_eq!(
            config.refresh_interval,
            Duration::from_secs(crate::constants::panel::MAX_REFRESH_INTERVAL_SECONDS)
        );
        assert_eq!(config.rotation_step, usize::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_with_extreme_config_keeps_rotating() {
        let service = Arc::new(MockDetailsService::reference());
        let mut panel = Panel::mount(
            service.clone(),
            PanelConfig::new(Duration::from_secs(u64::MAX), usize::MAX),
        )
        .await
        .unwrap();

        let len = panel.slots().len();
        for _ in 0..len * 2 {
            assert!(panel.advance().cursor < len);
        }
        panel.dispose();
    }

    #[tokio::test]
    async fn test_advance_after_dispose_is_inert() {
        let service = Arc::new(MockDetailsService::reference());
        let mut panel = Panel::mount(service, PanelConfig::default()).await.unwrap();

        panel.dispose();
        panel.dispose();
        assert!(panel.is_disposed());

        for _ in 0..4 {
            assert_eq!(panel.advance().cursor, 0);
        }
        assert!(panel.active_registrations().is_empty());
        assert!(!panel.drain_events());
        assert!(
            panel
                .slots()
                .iter()
                .filter(|slot| slot.is_dynamic())
                .all(|slot| slot.status == SlotStatus::Loading)
        );
    }

    #[tokio::test]
    async fn test_initial_window_with_dynamic_slot_is_armed() {
        let service = Arc::new(MockDetailsService::reference());
        let rotator = AttributeRotator::initialize(
            vec![StaticValue::new("project", "Project", "test-project")],
            vec![DynamicPlaceholder::new(CPU, "CPU", MetricKind::Cpu)],
        )
        .unwrap();

        let panel = Panel::new(rotator, service, Duration::from_secs(3));
        assert_eq!(panel.active_registrations(), vec![SlotId::from(CPU)]);
    }
}
