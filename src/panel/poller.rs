//! Visibility-driven refresh of dynamic slots.
//!
//! Every dynamic slot in the display window gets an immediate fetch and a
//! recurring timer; leaving the window cancels the timer. Timers and fetches
//! run as tokio tasks that post [`PanelEvent`]s back to the panel's queue, and
//! each carries the generation of the registration that created it so results
//! from a cancelled registration can be recognized and dropped.

use super::format::format_sample;
use super::reconcile::{ReconcilePlan, reconcile};
use super::rotator::AttributeRotator;
use super::slots::{DisplayWindow, SlotId, SlotUpdate};
use crate::constants::panel::{MAX_REFRESH_INTERVAL_SECONDS, MIN_REFRESH_INTERVAL_MILLIS};
use crate::error::AppError;
use crate::service::{DetailsService, MetricKind, UtilizationSample};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Work items delivered to the panel's event queue
#[derive(Debug)]
pub enum PanelEvent {
    /// Recurring timer fired for a registered slot
    Tick { slot: SlotId, generation: u64 },
    /// A utilization fetch finished
    FetchCompleted(FetchCompletion),
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub slot: SlotId,
    pub generation: u64,
    pub result: Result<UtilizationSample, AppError>,
}

/// Active refresh for one visible dynamic slot
#[derive(Debug)]
struct PollRegistration {
    metric: MetricKind,
    generation: u64,
    timer: JoinHandle<()>,
    fetch_in_flight: bool,
}

/// Clamps a refresh period to the range timers can run with
pub fn bounded_period(period: Duration) -> Duration {
    period.clamp(
        Duration::from_millis(MIN_REFRESH_INTERVAL_MILLIS),
        Duration::from_secs(MAX_REFRESH_INTERVAL_SECONDS),
    )
}

pub struct AdaptivePoller {
    service: Arc<dyn DetailsService>,
    events: UnboundedSender<PanelEvent>,
    period: Duration,
    registrations: HashMap<SlotId, PollRegistration>,
    /// Current generation per slot id; bumped whenever a registration is dropped
    generations: HashMap<SlotId, u64>,
    disposed: bool,
}

impl AdaptivePoller {
    pub fn new(
        service: Arc<dyn DetailsService>,
        events: UnboundedSender<PanelEvent>,
        period: Duration,
    ) -> Self {
        Self {
            service,
            events,
            period: bounded_period(period),
            registrations: HashMap::new(),
            generations: HashMap::new(),
            disposed: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Ids with an armed timer, sorted
    pub fn registered_ids(&self) -> Vec<SlotId> {
        let mut ids: Vec<SlotId> = self.registrations.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_registered(&self, id: &SlotId) -> bool {
        self.registrations.contains_key(id)
    }

    /// Arms newly visible dynamic slots and disarms the ones that left.
    pub fn on_window_changed(&mut self, window: &DisplayWindow) {
        if self.disposed {
            return;
        }
        let plan = reconcile(self.registrations.keys(), &window.dynamic_metrics());
        self.apply(plan);
    }

    /// Re-issues the fetch for a still-current registration.
    ///
    /// Ticks from a cancelled registration, or arriving while the previous
    /// fetch for the slot is still running, are dropped.
    pub fn on_tick(&mut self, slot: &SlotId, generation: u64) {
        if self.disposed {
            return;
        }
        let Some(registration) = self.registrations.get(slot) else {
            tracing::trace!("Dropping tick for unregistered slot {slot}");
            return;
        };
        if registration.generation != generation {
            tracing::trace!("Dropping stale tick for {slot} (generation {generation})");
            return;
        }
        if registration.fetch_in_flight {
            tracing::debug!("Previous {slot} fetch still running, skipping tick");
            return;
        }
        let metric = registration.metric;
        self.issue_fetch(slot.clone(), metric, generation);
    }

    /// Applies a fetch result to the rotator if it belongs to the current
    /// registration. Returns whether a slot changed.
    pub fn on_fetch_completed(
        &mut self,
        rotator: &mut AttributeRotator,
        completion: FetchCompletion,
    ) -> bool {
        let FetchCompletion {
            slot,
            generation,
            result,
        } = completion;

        if self.disposed {
            tracing::trace!("Discarding {slot} result after dispose");
            return false;
        }

        let Some(registration) = self.registrations.get_mut(&slot) else {
            tracing::trace!("Discarding {slot} result, slot no longer visible");
            return false;
        };
        if registration.generation != generation {
            tracing::trace!("Discarding stale {slot} result (generation {generation})");
            return false;
        }
        registration.fetch_in_flight = false;
        let metric = registration.metric;

        let update = match result {
            Ok(sample) => SlotUpdate::Value(format_sample(&sample)),
            Err(e) => SlotUpdate::Error(refresh_failure(&slot, metric, e).to_string()),
        };
        rotator.update_slot_value(&slot, update)
    }

    /// Cancels every timer; later ticks and fetch results are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let plan = reconcile(self.registrations.keys(), &[]);
        self.apply(plan);
        self.disposed = true;
        tracing::debug!("Adaptive poller disposed");
    }

    fn apply(&mut self, plan: ReconcilePlan) {
        for slot in plan.disarm {
            self.disarm(&slot);
        }
        for (slot, metric) in plan.arm {
            self.arm(slot, metric);
        }
    }

    fn arm(&mut self, slot: SlotId, metric: MetricKind) {
        let generation = self.generations.get(&slot).copied().unwrap_or(0);
        tracing::debug!("Arming {metric} refresh for {slot} every {:?}", self.period);

        let timer = self.spawn_timer(slot.clone(), generation);
        self.registrations.insert(
            slot.clone(),
            PollRegistration {
                metric,
                generation,
                timer,
                fetch_in_flight: false,
            },
        );
        self.issue_fetch(slot, metric, generation);
    }

    fn disarm(&mut self, slot: &SlotId) {
        if let Some(registration) = self.registrations.remove(slot) {
            registration.timer.abort();
            *self.generations.entry(slot.clone()).or_insert(0) += 1;
            tracing::debug!("Disarmed refresh for {slot}");
        }
    }

    fn issue_fetch(&mut self, slot: SlotId, metric: MetricKind, generation: u64) {
        if let Some(registration) = self.registrations.get_mut(&slot) {
            registration.fetch_in_flight = true;
        }

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = service.fetch_utilization(metric).await;
            let completion = FetchCompletion {
                slot,
                generation,
                result,
            };
            // Receiver is gone once the panel is dropped
            let _ = events.send(PanelEvent::FetchCompleted(completion));
        });
    }

    fn spawn_timer(&self, slot: SlotId, generation: u64) -> JoinHandle<()> {
        let events = self.events.clone();
        let period = self.period;
        let now = Instant::now();
        let first_tick = now.checked_add(period).unwrap_or(now);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let tick = PanelEvent::Tick {
                    slot: slot.clone(),
                    generation,
                };
                if events.send(tick).is_err() {
                    break;
                }
            }
        })
    }
}

/// Gives a failed fetch its metric context. Transient failures only warn;
/// the slot is retried on the next tick either way.
fn refresh_failure(slot: &SlotId, metric: MetricKind, error: AppError) -> AppError {
    if error.is_retryable() {
        tracing::warn!("Refreshing {slot} failed, will retry on next tick: {error}");
    } else {
        tracing::error!("Refreshing {slot} failed: {error}");
    }
    match error {
        AppError::MetricRefresh { .. } => error,
        other => AppError::metric_refresh(metric.label(), other.to_string()),
    }
}

impl Drop for AdaptivePoller {
    fn drop(&mut self) {
        for registration in self.registrations.values() {
            registration.timer.abort();
        }
    }
}
