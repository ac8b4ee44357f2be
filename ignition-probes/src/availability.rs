//! Application availability state.
//!
//! Two independent dimensions:
//! - liveness: is the process in a state it can recover from on its own?
//! - readiness: should traffic be routed to it?
//!
//! Any component may publish a change; subscribers are notified over a
//! broadcast channel.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::broadcast;

/// Capacity of the change-event channel. Slow subscribers lag, they do not block publishers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LivenessState {
    Live,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessState {
    AcceptingTraffic,
    RefusingTraffic,
}

/// A change to one of the availability dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityChangeEvent {
    Liveness(LivenessState),
    Readiness(ReadinessState),
}

impl AvailabilityChangeEvent {
    /// The application is ready to accept traffic.
    pub fn ready() -> Self {
        Self::Readiness(ReadinessState::AcceptingTraffic)
    }

    /// The application is temporarily refusing traffic.
    pub fn busy() -> Self {
        Self::Readiness(ReadinessState::RefusingTraffic)
    }

    pub fn live() -> Self {
        Self::Liveness(LivenessState::Live)
    }

    pub fn broken() -> Self {
        Self::Liveness(LivenessState::Broken)
    }
}

/// Read side of the availability state. Probes only ever see this.
pub trait ApplicationStateProvider: Send + Sync {
    fn liveness_state(&self) -> LivenessState;
    fn readiness_state(&self) -> ReadinessState;
}

/// Holds the current availability and fans out changes.
pub struct ApplicationAvailability {
    liveness: RwLock<LivenessState>,
    readiness: RwLock<ReadinessState>,
    events: broadcast::Sender<AvailabilityChangeEvent>,
}

impl std::fmt::Debug for ApplicationAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationAvailability")
            .field("liveness", &self.liveness_state())
            .field("readiness", &self.readiness_state())
            .finish()
    }
}

impl Default for ApplicationAvailability {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationAvailability {
    /// A freshly started application is live but not yet ready.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            liveness: RwLock::new(LivenessState::Live),
            readiness: RwLock::new(ReadinessState::RefusingTraffic),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AvailabilityChangeEvent> {
        self.events.subscribe()
    }

    /// Apply a change and notify subscribers.
    pub fn publish(&self, event: AvailabilityChangeEvent) {
        match event {
            AvailabilityChangeEvent::Liveness(state) => {
                let mut current = self.liveness.write().unwrap_or_else(|e| e.into_inner());
                if *current != state {
                    tracing::info!("Liveness changed: {:?} -> {:?}", *current, state);
                }
                *current = state;
            }
            AvailabilityChangeEvent::Readiness(state) => {
                let mut current = self.readiness.write().unwrap_or_else(|e| e.into_inner());
                if *current != state {
                    tracing::info!("Readiness changed: {:?} -> {:?}", *current, state);
                }
                *current = state;
            }
        }

        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl ApplicationStateProvider for ApplicationAvailability {
    fn liveness_state(&self) -> LivenessState {
        *self.liveness.read().unwrap_or_else(|e| e.into_inner())
    }

    fn readiness_state(&self) -> ReadinessState {
        *self.readiness.read().unwrap_or_else(|e| e.into_inner())
    }
}
