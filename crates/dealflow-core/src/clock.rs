//! Injected time source.
//!
//! Scheduling resolution and action derivation read "now" through this trait
//! so their output is deterministic and reproducible in tests.

use chrono::{DateTime, Utc};

use crate::types::Timestamp;

/// A source of the current time.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn now_timestamp(&self) -> Timestamp {
        Timestamp::from_datetime(self.now_utc())
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
