//! Generic time-boxed values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payload readable only until an absolute expiry instant.
///
/// Expiry is never polled in the background; callers supply `now` at each
/// access. A value counts as expired at the exact expiry instant
/// (`now >= expires_at`). The first read that observes the value expired
/// drops the payload for good: later reads return absent even if handed an
/// earlier `now`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expiring<T> {
    payload: Option<T>,
    expires_at: DateTime<Utc>,
}

impl<T> Expiring<T> {
    pub fn new(payload: T, expires_at: DateTime<Utc>) -> Self {
        Self {
            payload: Some(payload),
            expires_at,
        }
    }

    /// An already-expired box, used as a placeholder where no live value
    /// exists yet (or anymore).
    pub fn expired(now: DateTime<Utc>) -> Self {
        Self {
            payload: None,
            expires_at: now,
        }
    }

    /// True iff `now` is at or past the expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Read the payload, or absent once expired.
    ///
    /// Observing the value expired is an irreversible transition: the payload
    /// is dropped and every later read is absent.
    pub fn get(&mut self, now: DateTime<Utc>) -> Option<&T> {
        if self.is_expired(now) {
            self.payload = None;
        }
        self.payload.as_ref()
    }

    /// Read the payload without the consume-on-expiry transition.
    pub(crate) fn peek(&self, now: DateTime<Utc>) -> Option<&T> {
        if self.is_expired(now) {
            None
        } else {
            self.payload.as_ref()
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_live_value_is_readable() {
        let now = Utc::now();
        let mut boxed = Expiring::new("payload", now + Duration::minutes(1));

        assert!(!boxed.is_expired(now));
        assert_eq!(boxed.get(now), Some(&"payload"));
    }

    #[test]
    fn test_expired_at_exact_boundary() {
        let now = Utc::now();
        let boxed = Expiring::new("payload", now);

        assert!(boxed.is_expired(now));
    }

    #[test]
    fn test_get_is_absent_after_expiry() {
        let now = Utc::now();
        let mut boxed = Expiring::new("payload", now + Duration::seconds(30));

        assert_eq!(boxed.get(now + Duration::seconds(31)), None);
    }

    #[test]
    fn test_expired_observation_is_irreversible() {
        let now = Utc::now();
        let mut boxed = Expiring::new("payload", now + Duration::seconds(30));

        assert_eq!(boxed.get(now + Duration::minutes(1)), None);
        // An earlier `now` cannot bring the payload back.
        assert_eq!(boxed.get(now), None);
    }

    #[test]
    fn test_expired_placeholder_has_no_payload() {
        let now = Utc::now();
        let mut boxed: Expiring<String> = Expiring::expired(now);

        assert!(boxed.is_expired(now));
        assert_eq!(boxed.get(now), None);
    }
}
