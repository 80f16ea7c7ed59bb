use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Source of "now" for staleness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Expiry that every clock reading is at or after; forces the first read.
pub fn beginning_of_time() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

/// `now + interval`, saturating at the largest representable instant.
pub fn expiry_after(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(interval)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
