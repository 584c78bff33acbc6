//! Scaler configuration, validated before the loop starts.

use crate::error::ConfigError;

/// Validated inputs for the scaling policy's caller.
///
/// Construction rejects values the policy is not defined for, so the
/// loop never has to re-check them per iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalerConfig {
    /// Name of the queue whose backlog drives scaling.
    pub queue: String,
    /// How many jobs one worker instance services concurrently.
    pub agents_per_instance: i64,
}

impl ScalerConfig {
    /// Create a config, rejecting an empty queue name or a
    /// non-positive per-instance capacity.
    pub fn new(queue: impl Into<String>, agents_per_instance: i64) -> Result<Self, ConfigError> {
        let queue = queue.into();
        if queue.trim().is_empty() {
            return Err(ConfigError::EmptyQueue);
        }
        if agents_per_instance < 1 {
            return Err(ConfigError::AgentsPerInstance(agents_per_instance));
        }
        Ok(Self {
            queue,
            agents_per_instance,
        })
    }
}
