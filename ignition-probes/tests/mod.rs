use ignition_probes::{
    ApplicationAvailability, ApplicationStateProvider, AvailabilityChangeEvent, LivenessState,
    ProbeReport, ProbeStatus, ProbesEndpoint, ReadinessState,
};
use std::sync::Arc;

fn endpoint_with(availability: &Arc<ApplicationAvailability>) -> ProbesEndpoint {
    ProbesEndpoint::new(availability.clone())
}

// ============================================================================
// ApplicationAvailability Tests
// ============================================================================

#[test]
fn test_availability_initial_state() {
    let availability = ApplicationAvailability::new();
    assert_eq!(availability.liveness_state(), LivenessState::Live);
    assert_eq!(availability.readiness_state(), ReadinessState::RefusingTraffic);
}

#[test]
fn test_availability_ready_and_busy() {
    let availability = ApplicationAvailability::new();

    availability.publish(AvailabilityChangeEvent::ready());
    assert_eq!(availability.readiness_state(), ReadinessState::AcceptingTraffic);

    availability.publish(AvailabilityChangeEvent::busy());
    assert_eq!(availability.readiness_state(), ReadinessState::RefusingTraffic);
}

#[test]
fn test_availability_liveness_independent_of_readiness() {
    let availability = ApplicationAvailability::new();
    availability.publish(AvailabilityChangeEvent::broken());
    assert_eq!(availability.liveness_state(), LivenessState::Broken);
    assert_eq!(availability.readiness_state(), ReadinessState::RefusingTraffic);
}

#[test]
fn test_availability_publish_without_subscribers() {
    let availability = ApplicationAvailability::default();
    availability.publish(AvailabilityChangeEvent::live());
    assert_eq!(availability.liveness_state(), LivenessState::Live);
}

#[test]
fn test_availability_debug() {
    let availability = ApplicationAvailability::new();
    let debug = format!("{:?}", availability);
    assert!(debug.contains("ApplicationAvailability"));
    assert!(debug.contains("RefusingTraffic"));
}

#[tokio::test]
async fn test_availability_subscribers_receive_changes() {
    let availability = ApplicationAvailability::new();
    let mut rx = availability.subscribe();

    availability.publish(AvailabilityChangeEvent::ready());
    availability.publish(AvailabilityChangeEvent::broken());

    assert_eq!(rx.recv().await.unwrap(), AvailabilityChangeEvent::ready());
    assert_eq!(rx.recv().await.unwrap(), AvailabilityChangeEvent::broken());
}

#[test]
fn test_change_event_constructors() {
    assert_eq!(
        AvailabilityChangeEvent::ready(),
        AvailabilityChangeEvent::Readiness(ReadinessState::AcceptingTraffic)
    );
    assert_eq!(
        AvailabilityChangeEvent::busy(),
        AvailabilityChangeEvent::Readiness(ReadinessState::RefusingTraffic)
    );
    assert_eq!(
        AvailabilityChangeEvent::live(),
        AvailabilityChangeEvent::Liveness(LivenessState::Live)
    );
}

// ============================================================================
// ProbesEndpoint Tests
// ============================================================================

#[test]
fn test_probe_liveness_live_is_success() {
    let availability = Arc::new(ApplicationAvailability::new());
    let report = endpoint_with(&availability).probe("liveness").unwrap();
    assert_eq!(report.status, ProbeStatus::Success);
}

#[test]
fn test_probe_liveness_broken_is_failure() {
    let availability = Arc::new(ApplicationAvailability::new());
    availability.publish(AvailabilityChangeEvent::broken());
    let report = endpoint_with(&availability).probe("liveness").unwrap();
    assert_eq!(report.status, ProbeStatus::Failure);
}

#[test]
fn test_probe_readiness_follows_state() {
    let availability = Arc::new(ApplicationAvailability::new());
    let endpoint = endpoint_with(&availability);

    assert_eq!(endpoint.probe("readiness").unwrap().status, ProbeStatus::Failure);

    availability.publish(AvailabilityChangeEvent::ready());
    assert_eq!(endpoint.probe("readiness").unwrap().status, ProbeStatus::Success);
}

#[test]
fn test_probe_unknown_name_is_absent() {
    let availability = Arc::new(ApplicationAvailability::new());
    let endpoint = endpoint_with(&availability);
    assert!(endpoint.probe("unknown").is_none());
    assert!(endpoint.probe("").is_none());
    assert!(endpoint.probe("Liveness").is_none());
}

#[test]
fn test_probe_report_serialization() {
    let json = serde_json::to_string(&ProbeReport::from(LivenessState::Live)).unwrap();
    assert_eq!(json, r#"{"status":"SUCCESS"}"#);

    let json = serde_json::to_string(&ProbeReport::from(ReadinessState::RefusingTraffic)).unwrap();
    assert_eq!(json, r#"{"status":"FAILURE"}"#);
}

// A provider that is not ApplicationAvailability, to check the trait seam.
struct Fixed(LivenessState, ReadinessState);

impl ApplicationStateProvider for Fixed {
    fn liveness_state(&self) -> LivenessState {
        self.0
    }
    fn readiness_state(&self) -> ReadinessState {
        self.1
    }
}

#[test]
fn test_probe_custom_provider() {
    let endpoint = ProbesEndpoint::new(Arc::new(Fixed(
        LivenessState::Broken,
        ReadinessState::AcceptingTraffic,
    )));
    assert_eq!(endpoint.probe("liveness").unwrap().status, ProbeStatus::Failure);
    assert_eq!(endpoint.probe("readiness").unwrap().status, ProbeStatus::Success);
}
