//! Wall-clock timeline of completed steps.
//!
//! Steps carry raw clock readings. The timeline pins one reading to a
//! wall-clock instant and projects every step relative to it.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::steps::{Step, StepId, Tags};

const NANOS_PER_MILLI: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupTimeline {
    start_time: DateTime<Utc>,
    events: Vec<TimelineEvent>,
}

impl StartupTimeline {
    /// `start_nanos` is the clock reading taken at `start_time`.
    pub fn new(start_time: DateTime<Utc>, start_nanos: i64, steps: &[Step]) -> Self {
        let events = steps
            .iter()
            .map(|step| TimelineEvent::new(step, start_time, start_nanos))
            .collect();
        Self { start_time, events }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TimelineEvent> {
        self.events
    }
}

/// Build a timeline from completed steps, in the order given.
pub fn materialize(anchor: DateTime<Utc>, anchor_nanos: i64, steps: &[Step]) -> StartupTimeline {
    StartupTimeline::new(anchor, anchor_nanos, steps)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    step: Step,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    duration_ms: i64,
}

impl TimelineEvent {
    fn new(step: &Step, anchor: DateTime<Utc>, anchor_nanos: i64) -> Self {
        let time = step.time();
        // Clock readings may wrap; offsets are wrapping differences.
        let elapsed = time.end().wrapping_sub(time.start());
        debug_assert!(
            elapsed >= 0,
            "step {} ended before it started ({} < {})",
            step.id(),
            time.end(),
            time.start()
        );

        Self {
            step: step.clone(),
            start_time: anchor + TimeDelta::nanoseconds(time.start().wrapping_sub(anchor_nanos)),
            end_time: anchor + TimeDelta::nanoseconds(time.end().wrapping_sub(anchor_nanos)),
            duration_ms: elapsed / NANOS_PER_MILLI,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Processing time of the step, truncated to whole milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn step_id(&self) -> StepId {
        self.step.id()
    }

    pub fn step_name(&self) -> &str {
        self.step.name()
    }

    pub fn parent_id(&self) -> Option<StepId> {
        self.step.parent_id()
    }

    pub fn tags(&self) -> &Tags {
        self.step.tags()
    }
}
