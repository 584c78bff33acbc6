//! Process-lifetime record of scaling activity.
//!
//! One instance per running control loop, owned by the loop and
//! mutated only after a successful resize call. Never persisted:
//! a process restart starts with an empty history, which is an
//! accepted limitation, not a durability bug.

/// Timestamps of the last scale events and the last desired count
/// sent to the pool controller. Used for observability only; it
/// never gates a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScalingHistory {
    /// Epoch seconds of the last successful scale-out, if any.
    pub last_scale_out: Option<u64>,
    /// Epoch seconds of the last successful scale-in, if any.
    pub last_scale_in: Option<u64>,
    /// Last desired count successfully sent to the pool controller.
    pub last_desired: i64,
}

impl ScalingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful scale-out to `desired` at `now`.
    pub fn record_scale_out(&mut self, desired: i64, now: u64) {
        self.last_desired = desired;
        self.last_scale_out = Some(now);
    }

    /// Record a successful scale-in to `desired` at `now`.
    pub fn record_scale_in(&mut self, desired: i64, now: u64) {
        self.last_desired = desired;
        self.last_scale_in = Some(now);
    }

    /// Seconds since the last scale-out, if one has happened.
    pub fn since_scale_out(&self, now: u64) -> Option<u64> {
        self.last_scale_out.map(|t| now.saturating_sub(t))
    }

    /// Seconds since the last scale-in, if one has happened.
    pub fn since_scale_in(&self, now: u64) -> Option<u64> {
        self.last_scale_in.map(|t| now.saturating_sub(t))
    }
}
