//! Error types for the scaler and its collaborators.

use thiserror::Error;

/// Errors from the queue metrics source.
///
/// All variants are surfaced verbatim to the control loop; the loop
/// never interprets them beyond logging and skipping the iteration.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("invalid metrics endpoint: {0}")]
    Endpoint(String),

    #[error("metrics request failed: {0}")]
    Transport(String),

    #[error("metrics endpoint returned status {0}")]
    Status(u16),

    #[error("failed to decode metrics response: {0}")]
    Decode(String),
}

/// Errors from the pool controller.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid pool endpoint: {0}")]
    Endpoint(String),

    #[error("pool request failed: {0}")]
    Transport(String),

    #[error("pool manager returned status {0}")]
    Status(u16),

    #[error("failed to decode pool description: {0}")]
    Decode(String),
}

/// Configuration rejected before the loop starts.
///
/// These never reach the policy: a misconfigured scaler fails fast
/// rather than computing a nonsensical target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("agents per instance must be at least 1, got {0}")]
    AgentsPerInstance(i64),

    #[error("queue name must not be empty")]
    EmptyQueue,

    #[error("pool bounds are inconsistent: min {min} > max {max}")]
    InvalidBounds { min: i64, max: i64 },
}
