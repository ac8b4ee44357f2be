//! Probe lookup by name.
//!
//! The endpoint does not know about HTTP. A caller that exposes it over the
//! network is expected to turn `None` into a not-found response.

use serde::Serialize;
use std::sync::Arc;

use crate::availability::{ApplicationStateProvider, LivenessState, ReadinessState};

pub const LIVENESS_PROBE: &str = "liveness";
pub const READINESS_PROBE: &str = "readiness";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Success,
    Failure,
}

/// Result of a probe, shaped for JSON: `{"status":"SUCCESS"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub status: ProbeStatus,
}

impl From<LivenessState> for ProbeReport {
    fn from(state: LivenessState) -> Self {
        let status = match state {
            LivenessState::Live => ProbeStatus::Success,
            LivenessState::Broken => ProbeStatus::Failure,
        };
        Self { status }
    }
}

impl From<ReadinessState> for ProbeReport {
    fn from(state: ReadinessState) -> Self {
        let status = match state {
            ReadinessState::AcceptingTraffic => ProbeStatus::Success,
            ReadinessState::RefusingTraffic => ProbeStatus::Failure,
        };
        Self { status }
    }
}

#[derive(Clone)]
pub struct ProbesEndpoint {
    provider: Arc<dyn ApplicationStateProvider>,
}

impl std::fmt::Debug for ProbesEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbesEndpoint").finish()
    }
}

impl ProbesEndpoint {
    pub fn new(provider: Arc<dyn ApplicationStateProvider>) -> Self {
        Self { provider }
    }

    /// Query the probe called `name`. Unknown names yield `None`.
    pub fn probe(&self, name: &str) -> Option<ProbeReport> {
        match name {
            LIVENESS_PROBE => Some(self.provider.liveness_state().into()),
            READINESS_PROBE => Some(self.provider.readiness_state().into()),
            _ => None,
        }
    }
}
