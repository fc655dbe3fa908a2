//! Timed messages exchanged between agents.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::expiry::Expiring;

/// A message in flight: immutable once created, readable until its TTL
/// elapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID (ULID), for log correlation.
    id: String,
    /// Sender agent id.
    source_id: String,
    /// Recipient agent id.
    target_id: String,
    /// Body text; absent once the message expires.
    body: Expiring<String>,
    /// When the message was created.
    sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            body: Expiring::new(body.into(), now + ttl),
            sent_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.body.is_expired(now)
    }

    /// Read the body, or absent once the message has been observed expired.
    pub fn body(&mut self, now: DateTime<Utc>) -> Option<&str> {
        self.body.get(now).map(String::as_str)
    }
}
