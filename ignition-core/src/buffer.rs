//! Buffered recording.
//!
//! `StepBuffer` is the sink completed steps land in. `BufferingStartup` ties
//! a recorder, a buffer and a time anchor together so callers can pull a
//! timeline out at any point.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::{MonotonicClock, NanoClock};
use crate::config::RecorderConfig;
use crate::error::StartupError;
use crate::steps::{Step, StepHandle, StepId, StepRecorder, StepSink};
use crate::timeline::StartupTimeline;

pub type StepFilter = Arc<dyn Fn(&Step) -> bool + Send + Sync>;

/// Bounded, thread-safe list of completed steps in completion order.
pub struct StepBuffer {
    steps: Mutex<Vec<Step>>,
    capacity: usize,
    filter: Option<StepFilter>,
    dropped: AtomicUsize,
    full_reported: AtomicBool,
}

impl std::fmt::Debug for StepBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("dropped", &self.dropped())
            .finish()
    }
}

impl StepBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
            capacity,
            filter: None,
            dropped: AtomicUsize::new(0),
            full_reported: AtomicBool::new(false),
        }
    }

    /// Only steps for which `filter` returns true are kept.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Step) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Steps discarded because the buffer was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Copy of the buffered steps.
    pub fn snapshot(&self) -> Vec<Step> {
        self.lock().clone()
    }

    /// Take every buffered step, leaving the buffer empty.
    pub fn drain(&self) -> Vec<Step> {
        let steps = std::mem::take(&mut *self.lock());
        self.full_reported.store(false, Ordering::Relaxed);
        steps
    }

    // Buffer content is plain data, a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<Step>> {
        self.steps.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StepSink for StepBuffer {
    fn accept(&self, step: Step) {
        if let Some(filter) = &self.filter {
            if !filter(&step) {
                return;
            }
        }

        let mut steps = self.lock();
        if steps.len() >= self.capacity {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            if !self.full_reported.swap(true, Ordering::Relaxed) {
                tracing::warn!(
                    "Startup step buffer full (capacity {}), dropping step {:?}",
                    self.capacity,
                    step.name()
                );
            }
            return;
        }
        steps.push(step);
    }
}

/// Records startup steps into a buffer anchored at a wall-clock instant.
pub struct BufferingStartup {
    recorder: StepRecorder,
    buffer: Arc<StepBuffer>,
    clock: Arc<dyn NanoClock>,
    anchor: Mutex<(DateTime<Utc>, i64)>,
}

impl std::fmt::Debug for BufferingStartup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferingStartup")
            .field("start_time", &self.start_time())
            .field("recorder", &self.recorder)
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl BufferingStartup {
    pub fn new(config: &RecorderConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(config: &RecorderConfig, clock: Arc<dyn NanoClock>) -> Self {
        let mut buffer = StepBuffer::new(config.capacity);
        if !config.include_prefixes.is_empty() {
            let config = config.clone();
            buffer = buffer.with_filter(move |step| config.includes(step.name()));
        }
        let buffer = Arc::new(buffer);

        let recorder = StepRecorder::new(clock.clone(), buffer.clone());
        let anchor = Mutex::new((Utc::now(), clock.nano_time()));

        Self {
            recorder,
            buffer,
            clock,
            anchor,
        }
    }

    pub fn start(
        &self,
        name: impl Into<String>,
        parent: Option<StepId>,
    ) -> Result<StepHandle, StartupError> {
        self.recorder.start(name, parent)
    }

    /// Re-anchor the timeline at "now". Only allowed while nothing is buffered.
    pub fn start_recording(&self) -> Result<(), StartupError> {
        self.start_recording_at(Utc::now())
    }

    /// Re-anchor the timeline, pinning the current clock reading to `start_time`.
    pub fn start_recording_at(&self, start_time: DateTime<Utc>) -> Result<(), StartupError> {
        // Holding the buffer lock keeps steps from landing between the check and the re-anchor.
        let steps = self.buffer.lock();
        if !steps.is_empty() {
            return Err(StartupError::RecordingAlreadyStarted);
        }
        let mut anchor = self.anchor.lock().unwrap_or_else(|e| e.into_inner());
        *anchor = (start_time, self.clock.nano_time());
        Ok(())
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.anchor().0
    }

    /// Timeline of what is buffered so far. The buffer is left untouched.
    pub fn buffered_timeline(&self) -> StartupTimeline {
        let (start_time, start_nanos) = self.anchor();
        StartupTimeline::new(start_time, start_nanos, &self.buffer.snapshot())
    }

    /// Timeline of what is buffered so far, emptying the buffer.
    pub fn drain_buffered_timeline(&self) -> StartupTimeline {
        let (start_time, start_nanos) = self.anchor();
        StartupTimeline::new(start_time, start_nanos, &self.buffer.drain())
    }

    pub fn recorder(&self) -> &StepRecorder {
        &self.recorder
    }

    pub fn buffer(&self) -> &StepBuffer {
        &self.buffer
    }

    fn anchor(&self) -> (DateTime<Utc>, i64) {
        *self.anchor.lock().unwrap_or_else(|e| e.into_inner())
    }
}
