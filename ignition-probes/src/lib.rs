//! # Ignition Probes
//!
//! Liveness / readiness state of the running application, and the probe
//! lookup that reports it as SUCCESS or FAILURE.

pub mod availability;
pub mod endpoint;

pub use availability::{
    ApplicationAvailability, ApplicationStateProvider, AvailabilityChangeEvent, LivenessState,
    ReadinessState,
};
pub use endpoint::{LIVENESS_PROBE, ProbeReport, ProbeStatus, ProbesEndpoint, READINESS_PROBE};
