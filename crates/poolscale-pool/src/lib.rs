//! poolscale-pool — pool controller adapter.
//!
//! Thin HTTP client for the pool-manager API: describe the pool's
//! desired/min/max size, and set a new desired size. The scaler never
//! interprets provider-specific behavior beyond these two calls.

pub mod client;
pub mod dry_run;

pub use client::PoolApiClient;
pub use dry_run::DryRunPool;
