//! # Ignition Core
//!
//! Records timed, nestable startup steps and turns them into a wall-clock
//! timeline once startup is over (or at any point before).

pub mod buffer;
pub mod clock;
pub mod config;
pub mod error;
pub mod steps;
pub mod timeline;

// Re-export the main types so users can just use `ignition_core::BufferingStartup`
pub use buffer::{BufferingStartup, StepBuffer, StepFilter};
pub use clock::{ManualClock, MonotonicClock, NanoClock};
pub use config::RecorderConfig;
pub use error::StartupError;
pub use steps::{Step, StepHandle, StepId, StepRecorder, StepSink, Tag, Tags, TimeRecord};
pub use timeline::{StartupTimeline, TimelineEvent, materialize};
