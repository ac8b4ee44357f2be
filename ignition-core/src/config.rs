use serde::{Deserialize, Serialize};

use crate::error::StartupError;

pub const ENV_CAPACITY: &str = "IGNITION_STARTUP_CAPACITY";
pub const ENV_INCLUDE: &str = "IGNITION_STARTUP_INCLUDE";

const DEFAULT_CAPACITY: usize = 10_000;

/// Settings for a buffering startup recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Maximum number of completed steps kept in the buffer.
    pub capacity: usize,
    /// If non-empty, only steps whose name starts with one of these are kept.
    pub include_prefixes: Vec<String>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            include_prefixes: Vec::new(),
        }
    }
}

impl RecorderConfig {
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CAPACITY) {
            config.capacity = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(StartupError::InvalidConfig {
                        key: ENV_CAPACITY,
                        value: raw,
                    });
                }
            };
        }

        if let Some(raw) = lookup(ENV_INCLUDE) {
            config.include_prefixes = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }

    pub fn includes(&self, step_name: &str) -> bool {
        self.include_prefixes.is_empty()
            || self
                .include_prefixes
                .iter()
                .any(|prefix| step_name.starts_with(prefix.as_str()))
    }
}
