//! Execution environment: who is calling, and what time it is.
//!
//! Neither value is accepted from the caller's arguments. The submitter comes
//! from the authenticated [`CallContext`] and the timestamp from the
//! [`Clock`] owned by the write boundary.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SubsecRound, Utc};

use crate::types::Address;

/// Identity of the caller performing a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub submitter: Address,
}

impl CallContext {
    pub fn new(submitter: Address) -> Self {
        Self { submitter }
    }
}

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Deterministic clock for tests and replays. Advances by `step_secs` on
/// every read.
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
    step_secs: i64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_step(start, 0)
    }

    pub fn with_step(start: DateTime<Utc>, step_secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(start.timestamp()),
            step_secs,
        }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        self.secs.store(time.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let max = DateTime::<Utc>::MAX_UTC.timestamp();
        let min = DateTime::<Utc>::MIN_UTC.timestamp();
        let step = self.step_secs;
        // Saturates at the representable range instead of wrapping.
        let advance = |s: i64| Some(s.saturating_add(step).clamp(min, max));
        let (Ok(secs) | Err(secs)) = self
            .secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, advance);
        DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_has_no_subseconds() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos(), 0);
        assert!(now.timestamp() > 0);
    }

    #[test]
    fn test_manual_clock_steps() {
        let start = DateTime::from_timestamp(1_000, 0).unwrap();
        let clock = ManualClock::with_step(start, 12);
        assert_eq!(clock.now().timestamp(), 1_000);
        assert_eq!(clock.now().timestamp(), 1_012);
        clock.set(start);
        assert_eq!(clock.now().timestamp(), 1_000);
    }

    #[test]
    fn test_manual_clock_saturates_instead_of_wrapping() {
        let start = DateTime::from_timestamp(1_000, 0).unwrap();
        let clock = ManualClock::with_step(start, i64::MAX);
        assert_eq!(clock.now(), start);
        let max = DateTime::<Utc>::MAX_UTC.timestamp();
        for _ in 0..3 {
            let t = clock.now();
            assert_eq!(t.timestamp(), max);
            assert!(t >= start);
        }

        let back = ManualClock::with_step(start, i64::MIN);
        assert_eq!(back.now(), start);
        assert_eq!(back.now().timestamp(), DateTime::<Utc>::MIN_UTC.timestamp());
    }
}
