//! Time sources for pull-based expiry.
//!
//! Nothing in the broker runs on a timer; every expiry decision compares a
//! stored instant against a `Clock::now()` taken at the moment of access.
#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// A source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests to cross TTL
/// boundaries deterministically.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(Utc::now());
        let before = clock.now();

        clock.advance(Duration::seconds(90));

        assert_eq!(clock.now() - before, Duration::seconds(90));
    }

    #[test]
    fn test_manual_clock_is_settable() {
        let start = Utc::now();
        let clock = ManualClock::new(start);

        clock.set(start + Duration::minutes(5));

        assert_eq!(clock.now(), start + Duration::minutes(5));
    }
}
