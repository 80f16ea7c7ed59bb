// tests/common/mod.rs
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use tempfile::TempDir;

use crate::helpers::time::Clock;
use crate::observability::metrics::get_metrics;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(now) })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock().unwrap() += TimeDelta::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Fixed starting instant for deterministic expiry assertions.
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn at(secs_after_t0: i64) -> DateTime<Utc> {
    t0() + TimeDelta::seconds(secs_after_t0)
}

/// Temp dir holding a token file with `content`.
pub fn token_file(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("token");
    std::fs::write(&path, content).expect("write token");
    (dir, path)
}

/// Successful reads of `path` recorded so far. Paths are unique per test.
pub async fn reads(path: &Path) -> u64 {
    let label = path.display().to_string();
    get_metrics().await.token_reads.with_label_values(&[label.as_str()]).get()
}

pub async fn read_failures(path: &Path, reason: &str) -> u64 {
    let label = path.display().to_string();
    get_metrics()
        .await
        .token_read_failures
        .with_label_values(&[label.as_str(), reason])
        .get()
}
