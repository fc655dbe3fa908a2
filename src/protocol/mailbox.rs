//! Per-agent mailboxes holding undelivered messages.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;

/// FIFO queue of timed messages belonging to one agent.
///
/// Expired messages are removed lazily: every operation sweeps the queue
/// before doing its work, and nothing else ever does. The sweep preserves
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mailbox {
    /// Agent ID owning this mailbox.
    owner_id: String,
    /// Messages in insertion order, oldest first.
    queue: VecDeque<Message>,
}

impl Mailbox {
    /// Create an empty mailbox for an agent.
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            queue: VecDeque::new(),
        }
    }

    /// Add a message to the mailbox.
    ///
    /// Succeeds iff the message is addressed to this mailbox's owner and has
    /// not already expired. The queue is unbounded.
    pub fn add_message(&mut self, message: Message, now: DateTime<Utc>) -> bool {
        self.sweep(now);

        if message.target_id() == self.owner_id && !message.is_expired(now) {
            self.queue.push_back(message);
            true
        } else {
            false
        }
    }

    /// Check if there are any live messages in the mailbox.
    pub fn has_messages(&mut self, now: DateTime<Utc>) -> bool {
        self.sweep(now);
        !self.queue.is_empty()
    }

    /// Remove and return the next message on a FIFO basis.
    pub fn consume_next(&mut self, now: DateTime<Utc>) -> Option<Message> {
        self.sweep(now);
        self.queue.pop_front()
    }

    /// Drop expired messages.
    fn sweep(&mut self, now: DateTime<Utc>) {
        self.queue.retain(|m| !m.is_expired(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const OWNER_ID: &str = "1234xy";
    const SENDER_ID: &str = "5678vw";

    fn message(body: &str, now: DateTime<Utc>) -> Message {
        Message::new(SENDER_ID, OWNER_ID, body, now, Duration::minutes(30))
    }

    #[test]
    fn test_add_message_accepts_live_message_for_owner() {
        let now = Utc::now();
        let mut mailbox = Mailbox::new(OWNER_ID);

        assert!(mailbox.add_message(message("msg", now), now));
        assert!(mailbox.has_messages(now));
    }

    #[test]
    fn test_add_message_rejects_wrong_target() {
        let now = Utc::now();
        let mut mailbox = Mailbox::new(OWNER_ID);
        let stray = Message::new(SENDER_ID, "AnotherID", "msg", now, Duration::minutes(30));

        assert!(!mailbox.add_message(stray, now));
        assert!(!mailbox.has_messages(now));
    }

    #[test]
    fn test_add_message_rejects_expired_message() {
        let sent = Utc::now();
        let mut mailbox = Mailbox::new(OWNER_ID);
        let stale = message("msg", sent);

        assert!(!mailbox.add_message(stale, sent + Duration::minutes(30)));
    }

    #[test]
    fn test_consume_next_is_fifo() {
        let now = Utc::now();
        let mut mailbox = Mailbox::new(OWNER_ID);
        mailbox.add_message(message("msg1", now), now);
        mailbox.add_message(message("msg2", now), now);

        let mut first = mailbox.consume_next(now).unwrap();
        assert_eq!(first.body(now), Some("msg1"));

        let mut second = mailbox.consume_next(now).unwrap();
        assert_eq!(second.body(now), Some("msg2"));
    }

    #[test]
    fn test_consume_next_empty_is_absent() {
        let now = Utc::now();
        let mut mailbox = Mailbox::new(OWNER_ID);

        assert!(mailbox.consume_next(now).is_none());
    }

    #[test]
    fn test_expired_messages_are_swept_not_returned() {
        let now = Utc::now();
        let mut mailbox = Mailbox::new(OWNER_ID);
        mailbox.add_message(message("msg", now), now);

        let later = now + Duration::minutes(31);
        assert!(!mailbox.has_messages(later));
        assert!(mailbox.consume_next(later).is_none());
    }

    #[test]
    fn test_sweep_keeps_younger_messages_in_order() {
        let now = Utc::now();
        let mut mailbox = Mailbox::new(OWNER_ID);
        mailbox.add_message(message("old", now), now);

        let later = now + Duration::minutes(20);
        mailbox.add_message(message("young1", later), later);
        mailbox.add_message(message("young2", later), later);

        // "old" expires first; the younger two survive in insertion order.
        let after_old = now + Duration::minutes(31);
        let mut next = mailbox.consume_next(after_old).unwrap();
        assert_eq!(next.body(after_old), Some("young1"));
    }
}
