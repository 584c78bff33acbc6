//! poolscale-core — shared types for the backlog-driven pool scaler.
//!
//! Holds the domain types exchanged between the scaler and its two
//! collaborators (the queue metrics source and the pool controller),
//! the collaborator traits themselves, and the validated scaler
//! configuration. This crate performs no I/O so the decision logic in
//! `poolscale-scaler` can be tested entirely against in-memory fakes.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::ScalerConfig;
pub use error::{ConfigError, PoolError, QueueError};
pub use traits::{PoolController, QueueMetrics};
pub use types::{PoolState, ScaleDirection, ScalingDecision};
