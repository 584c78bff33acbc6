//! poolscale-queue — queue metrics adapter.
//!
//! Thin HTTP client for a Buildkite-style agent metrics endpoint.
//! One operation: the scheduled-job count for a named queue, with a
//! queue missing from the response treated as backlog zero.

pub mod client;

pub use client::AgentMetricsClient;
