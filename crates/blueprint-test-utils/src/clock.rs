//! A hand-driven clock

use std::cell::Cell;
use std::rc::Rc;

use blueprint_resolve::Clock;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Clock whose time only moves when a test says so.
///
/// Clones share the same time, so a test can keep one handle while the cache
/// under test owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    /// Start at 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Move time forward by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        self.now.set(self.now.get() + TimeDelta::seconds(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
