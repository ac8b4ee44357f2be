//! Step model + recorder.
//!
//! A "step" is one timed unit of startup work:
//! - name + id
//! - optional parent id
//! - start/end clock readings
//! - tags
//!
//! The recorder hands out live handles and forwards completed steps to a sink.

pub mod model;
pub mod recorder;

pub use model::{Step, StepId, Tag, Tags, TimeRecord};
pub use recorder::{StepHandle, StepRecorder, StepSink};
