use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("step name must not be empty")]
    EmptyStepName,

    #[error("cannot restart recording once steps have been buffered")]
    RecordingAlreadyStarted,

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}
