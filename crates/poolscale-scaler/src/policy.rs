//! The scaling policy — a pure function from observed backlog and
//! pool bounds to a capacity decision.
//!
//! No side effects, no history access, cannot fail. Callers validate
//! `agents_per_instance >= 1` and `min <= max` before invoking.

use std::cmp::Ordering;

use poolscale_core::{PoolState, ScaleDirection, ScalingDecision};

/// Map a backlog count and pool bounds to a clamped target size and
/// scale direction.
///
/// A zero backlog short-circuits to a raw target of zero; otherwise
/// the raw target is `ceil(backlog / agents_per_instance)` in integer
/// arithmetic. The raw target is then clamped into
/// `[pool.min, pool.max]`, and the direction falls out of comparing
/// the clamped target to `pool.desired`.
pub fn evaluate(backlog: i64, agents_per_instance: i64, pool: &PoolState) -> ScalingDecision {
    let raw = if backlog == 0 {
        0
    } else {
        (backlog + agents_per_instance - 1) / agents_per_instance
    };

    let (target, capped) = if raw > pool.max {
        (pool.max, true)
    } else if raw < pool.min {
        (pool.min, false)
    } else {
        (raw, false)
    };

    let direction = match target.cmp(&pool.desired) {
        Ordering::Greater => ScaleDirection::Out,
        Ordering::Less => ScaleDirection::In,
        Ordering::Equal => ScaleDirection::NoChange,
    };

    ScalingDecision {
        target,
        direction,
        capped,
    }
}
