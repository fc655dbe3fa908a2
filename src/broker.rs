//! The message broker: agent records, credential lifecycle, and delivery.
//!
//! The broker owns the only copy of every agent's protocol state. All
//! operations take one coarse lock over the record table, so every
//! check-then-mutate sequence (most importantly the quota gate inside
//! `send_message`) is atomic with respect to concurrent callers, and a send
//! touching two records needs no lock-ordering protocol.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};

use crate::clock::{Clock, SystemClock};
use crate::config::BrokerLimits;
use crate::protocol::{random_key, Credential, DeliveryStatus, Mailbox, Message};

/// One agent's broker-side state, created lazily on the first registration
/// touch and kept for the process lifetime.
#[derive(Debug)]
struct AgentRecord {
    /// Proof the agent was cleared to register. Starts expired.
    login_key: Credential,
    /// Proof of an active session. Starts expired; logout re-expires it.
    session_key: Credential,
    mailbox: Mailbox,
    /// Messages sent in the current session.
    messages_sent: u32,
    /// Messages received in the current session.
    messages_recv: u32,
}

impl AgentRecord {
    fn new(agent_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            login_key: Credential::expired(now),
            session_key: Credential::expired(now),
            mailbox: Mailbox::new(agent_id),
            messages_sent: 0,
            messages_recv: 0,
        }
    }
}

/// The broker. Cheap to share behind an `Arc`; all interior mutability is
/// behind the record-table mutex.
pub struct Broker {
    records: Mutex<HashMap<String, AgentRecord>>,
    limits: BrokerLimits,
    /// One pattern per blocked word: the word plus at most one trailing
    /// whitespace character, matched case-insensitively.
    blocked: Vec<Regex>,
    clock: Arc<dyn Clock>,
}

impl Broker {
    pub fn new(limits: BrokerLimits) -> Self {
        Self::with_clock(limits, Arc::new(SystemClock))
    }

    pub fn with_clock(limits: BrokerLimits, clock: Arc<dyn Clock>) -> Self {
        let blocked = limits
            .blocked_words
            .iter()
            .map(|word| {
                RegexBuilder::new(&format!(r"{}\s?", regex::escape(word)))
                    .case_insensitive(true)
                    .build()
                    .expect("escaped blocked word is a valid pattern")
            })
            .collect();

        Self {
            records: Mutex::new(HashMap::new()),
            limits,
            blocked,
            clock,
        }
    }

    pub fn limits(&self) -> &BrokerLimits {
        &self.limits
    }

    /// The broker's current instant, from its injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Store a login key for an agent, creating its record if absent.
    ///
    /// The key must have exactly the configured length, and no agent
    /// (including this one) may currently hold a live login key with the same
    /// value. On success the agent's login key is replaced with a fresh
    /// credential on the login-key TTL; nothing changes otherwise.
    pub fn register_login_key(&self, agent_id: &str, login_key: &str) -> bool {
        let now = self.clock.now();
        let mut records = self.records.lock().unwrap();

        if login_key.chars().count() != self.limits.login_key_length {
            tracing::debug!(agent = agent_id, "login key rejected: wrong length");
            return false;
        }
        if records.values().any(|r| r.login_key.matches(login_key, now)) {
            tracing::debug!(agent = agent_id, "login key rejected: value in use");
            return false;
        }

        let record = records
            .entry(agent_id.to_string())
            .or_insert_with(|| AgentRecord::new(agent_id, now));
        record.login_key = Credential::new(login_key, now + self.limits.login_key_ttl());

        tracing::debug!(agent = agent_id, "login key registered");
        true
    }

    /// Exchange a live, matching login key for a fresh session key.
    ///
    /// On success both session counters reset and the new key is returned.
    /// The login key itself is left untouched (it lapses on its own TTL).
    /// No partial mutation on failure.
    pub fn login(&self, agent_id: &str, login_key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut records = self.records.lock().unwrap();

        let record = records.get_mut(agent_id)?;
        if !record.login_key.matches(login_key, now) {
            tracing::debug!(agent = agent_id, "login refused");
            return None;
        }

        let session_key = random_key(self.limits.session_key_length, &self.limits.key_alphabet);
        record.session_key =
            Credential::new(session_key.clone(), now + self.limits.session_key_ttl());
        record.messages_sent = 0;
        record.messages_recv = 0;

        tracing::info!(agent = agent_id, "agent logged in");
        Some(session_key)
    }

    /// Force the agent's session to expire and reset its counters.
    ///
    /// Returns false only if the agent has no record at all.
    pub fn logout(&self, agent_id: &str) -> bool {
        let now = self.clock.now();
        let mut records = self.records.lock().unwrap();

        match records.get_mut(agent_id) {
            Some(record) => {
                Self::force_logout(record, now);
                tracing::info!(agent = agent_id, "agent logged out");
                true
            }
            None => false,
        }
    }

    /// True iff the agent exists and holds a live session key.
    pub fn agent_logged_in(&self, agent_id: &str) -> bool {
        let now = self.clock.now();
        let records = self.records.lock().unwrap();

        records
            .get(agent_id)
            .map_or(false, |r| !r.session_key.is_expired(now))
    }

    /// Send a message from `source_id` to `target_id`.
    ///
    /// Checks run in a fixed priority order and the first failure wins:
    /// source exists, target exists, source logged in, session key matches,
    /// body length, quotas. A quota hit forces a full logout of the offending
    /// side (both sides can fire independently) and the message is not sent.
    /// Otherwise blocked words are stripped and the message lands in the
    /// target's mailbox, bumping both counters.
    pub fn send_message(
        &self,
        session_key: &str,
        source_id: &str,
        target_id: &str,
        body: &str,
    ) -> DeliveryStatus {
        let now = self.clock.now();
        let mut records = self.records.lock().unwrap();

        if !records.contains_key(source_id) {
            return DeliveryStatus::SourceAgentDoesNotExist;
        }
        if !records.contains_key(target_id) {
            return DeliveryStatus::TargetAgentDoesNotExist;
        }

        let source = &records[source_id];
        if source.session_key.is_expired(now) {
            return DeliveryStatus::SourceAgentNotLoggedIn;
        }
        if !source.session_key.matches(session_key, now) {
            return DeliveryStatus::SessionKeyUnrecognized;
        }
        if body.chars().count() > self.limits.max_message_length {
            return DeliveryStatus::MessageLengthExceeded;
        }

        let source_over = records[source_id].messages_sent == self.limits.max_messages_sent;
        let target_over = records[target_id].messages_recv == self.limits.max_messages_recv;
        if source_over {
            tracing::warn!(agent = source_id, "send quota exceeded, forcing logout");
            Self::force_logout(records.get_mut(source_id).unwrap(), now);
        }
        if target_over {
            tracing::warn!(agent = target_id, "receive quota exceeded, forcing logout");
            Self::force_logout(records.get_mut(target_id).unwrap(), now);
        }
        match (source_over, target_over) {
            (true, true) => return DeliveryStatus::BothAgentQuotasExceeded,
            (true, false) => return DeliveryStatus::SourceAgentQuotaExceeded,
            (false, true) => return DeliveryStatus::TargetAgentQuotaExceeded,
            (false, false) => {}
        }

        let message = Message::new(
            source_id,
            target_id,
            self.strip_blocked_words(body),
            now,
            self.limits.message_ttl(),
        );
        let message_id = message.id().to_string();

        let target = records.get_mut(target_id).unwrap();
        if target.mailbox.add_message(message, now) {
            target.messages_recv += 1;
            records.get_mut(source_id).unwrap().messages_sent += 1;
            tracing::debug!(
                id = %message_id,
                source = source_id,
                target = target_id,
                "message delivered"
            );
            DeliveryStatus::Ok
        } else {
            tracing::error!(
                id = %message_id,
                source = source_id,
                target = target_id,
                "mailbox refused a freshly built message"
            );
            DeliveryStatus::FailedToAddToMailbox
        }
    }

    /// True iff the agent exists and its mailbox holds a live message.
    /// Requires no session.
    pub fn agent_has_messages(&self, agent_id: &str) -> bool {
        let now = self.clock.now();
        let mut records = self.records.lock().unwrap();

        records
            .get_mut(agent_id)
            .map_or(false, |r| r.mailbox.has_messages(now))
    }

    /// Consume the next message from the agent's mailbox.
    ///
    /// Requires the agent to exist, be logged in, and present its matching
    /// session key; absent otherwise.
    pub fn get_next_message(&self, session_key: &str, agent_id: &str) -> Option<Message> {
        let now = self.clock.now();
        let mut records = self.records.lock().unwrap();

        let record = records.get_mut(agent_id)?;
        if record.session_key.is_expired(now) || !record.session_key.matches(session_key, now) {
            return None;
        }
        record.mailbox.consume_next(now)
    }

    fn force_logout(record: &mut AgentRecord, now: DateTime<Utc>) {
        record.session_key = Credential::expired(now);
        record.messages_sent = 0;
        record.messages_recv = 0;
    }

    fn strip_blocked_words(&self, body: &str) -> String {
        let mut cleaned = body.to_string();
        for pattern in &self.blocked {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }
        cleaned
    }
}
