//! Step recorder.
//!
//! Inputs:
//! - `start(name, parent)` from any thread
//! - tags appended on the returned handle
//! - `end()` on the handle
//!
//! Output:
//! - completed `Step`s handed to a `StepSink`
//!
//! A handle owns its step until `end` moves it into the sink, so a step can
//! be completed at most once and cannot be tagged afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::clock::NanoClock;
use crate::error::StartupError;

use super::model::{Step, StepId, Tag};

const DEFAULT_BASE_ID: StepId = 1;

/// Receives completed steps.
pub trait StepSink: Send + Sync {
    fn accept(&self, step: Step);
}

impl<F> StepSink for F
where
    F: Fn(Step) + Send + Sync,
{
    fn accept(&self, step: Step) {
        self(step)
    }
}

pub struct StepRecorder {
    next_id: AtomicU64,
    in_flight: Arc<AtomicUsize>,
    clock: Arc<dyn NanoClock>,
    sink: Arc<dyn StepSink>,
}

impl std::fmt::Debug for StepRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRecorder")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl StepRecorder {
    pub fn new(clock: Arc<dyn NanoClock>, sink: Arc<dyn StepSink>) -> Self {
        Self::with_base_id(clock, sink, DEFAULT_BASE_ID)
    }

    pub fn with_base_id(clock: Arc<dyn NanoClock>, sink: Arc<dyn StepSink>, base: StepId) -> Self {
        Self {
            next_id: AtomicU64::new(base),
            in_flight: Arc::new(AtomicUsize::new(0)),
            clock,
            sink,
        }
    }

    /// Begin a new step. `parent` is stored as given.
    pub fn start(
        &self,
        name: impl Into<String>,
        parent: Option<StepId>,
    ) -> Result<StepHandle, StartupError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StartupError::EmptyStepName);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let step = Step::new(id, name, parent, self.clock.nano_time());
        tracing::debug!("step started id={} name={:?} parent={:?}", id, step.name(), parent);

        self.in_flight.fetch_add(1, Ordering::Relaxed);
        Ok(StepHandle {
            step,
            clock: self.clock.clone(),
            sink: self.sink.clone(),
            guard: InFlightGuard {
                counter: self.in_flight.clone(),
                id,
                completed: false,
            },
        })
    }

    /// Steps started but neither ended nor dropped yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }
}

/// A live step. Tag it, then `end()` it.
pub struct StepHandle {
    step: Step,
    clock: Arc<dyn NanoClock>,
    sink: Arc<dyn StepSink>,
    guard: InFlightGuard,
}

impl StepHandle {
    pub fn id(&self) -> StepId {
        self.step.id()
    }

    pub fn name(&self) -> &str {
        self.step.name()
    }

    pub fn parent_id(&self) -> Option<StepId> {
        self.step.parent_id()
    }

    pub fn tag(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.step.tags_mut().push(Tag::new(key, value));
        self
    }

    /// Tag with a value computed right now, only because this step is being tagged.
    pub fn tag_with<F>(&mut self, key: impl Into<String>, value: F) -> &mut Self
    where
        F: FnOnce() -> String,
    {
        self.tag(key, value())
    }

    /// Record the end time and hand the step to the sink.
    pub fn end(self) {
        let StepHandle {
            mut step,
            clock,
            sink,
            mut guard,
        } = self;

        step.record_end(clock.nano_time());
        guard.completed = true;
        tracing::debug!(
            "step ended id={} name={:?} nanos={}",
            step.id(),
            step.name(),
            step.time().end().wrapping_sub(step.time().start())
        );
        sink.accept(step);
    }
}

impl std::fmt::Debug for StepHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepHandle").field("step", &self.step).finish()
    }
}

#[derive(Debug)]
struct InFlightGuard {
    counter: Arc<AtomicUsize>,
    id: StepId,
    completed: bool,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
        if !self.completed {
            tracing::debug!("step abandoned without end id={}", self.id);
        }
    }
}
