//! Client-side agent facade.
//!
//! A thin two-step wrapper bound to one agent id: ask the gatekeeper for a
//! login key, exchange it for a session key, send. It remembers the two
//! credentials it was given and holds no other protocol state.

use std::sync::Arc;

use crate::broker::Broker;
use crate::gatekeeper::Gatekeeper;
use crate::protocol::DeliveryStatus;

pub struct Agent {
    id: String,
    broker: Arc<Broker>,
    gatekeeper: Arc<dyn Gatekeeper>,
    login_key: Option<String>,
    session_key: Option<String>,
}

impl Agent {
    pub fn new(id: impl Into<String>, broker: Arc<Broker>, gatekeeper: Arc<dyn Gatekeeper>) -> Self {
        Self {
            id: id.into(),
            broker,
            gatekeeper,
            login_key: None,
            session_key: None,
        }
    }

    /// An agent that already holds a login key (e.g. restored from a cookie).
    pub fn with_login_key(
        id: impl Into<String>,
        broker: Arc<Broker>,
        gatekeeper: Arc<dyn Gatekeeper>,
        login_key: impl Into<String>,
    ) -> Self {
        let mut agent = Self::new(id, broker, gatekeeper);
        agent.login_key = Some(login_key.into());
        agent
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ask the gatekeeper for a login key.
    ///
    /// On refusal no key is stored and false is returned.
    pub fn register(&mut self) -> bool {
        self.login_key = self.gatekeeper.issue_login_key(&self.id);
        self.login_key.is_some()
    }

    /// Exchange the held login key for a session key.
    pub fn login(&mut self) -> bool {
        self.session_key = self
            .login_key
            .as_deref()
            .and_then(|key| self.broker.login(&self.id, key));
        self.session_key.is_some()
    }

    /// Send a message to the destination agent.
    ///
    /// Refused locally, without contacting the broker, when no session key is
    /// held.
    pub fn send_message(&self, destination_id: &str, body: &str) -> DeliveryStatus {
        match self.session_key.as_deref() {
            None => DeliveryStatus::SourceAgentNotLoggedIn,
            Some(session_key) => self
                .broker
                .send_message(session_key, &self.id, destination_id, body),
        }
    }

    /// The login key held, if any.
    pub fn login_key(&self) -> Option<&str> {
        self.login_key.as_deref()
    }

    /// The session key held, if any.
    pub fn session_key(&self) -> Option<&str> {
        self.session_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrokerLimits;
    use crate::gatekeeper::PrefixGatekeeper;

    fn fixture() -> (Arc<Broker>, Arc<dyn Gatekeeper>) {
        let broker = Arc::new(Broker::new(BrokerLimits::default()));
        let gatekeeper: Arc<dyn Gatekeeper> = Arc::new(PrefixGatekeeper::new(
            broker.clone(),
            vec!["spy-".to_string()],
        ));
        (broker, gatekeeper)
    }

    #[test]
    fn test_register_denied_stores_no_key() {
        let (broker, gatekeeper) = fixture();
        let mut agent = Agent::new("spy-007", broker, gatekeeper);

        assert!(!agent.register());
        assert!(agent.login_key().is_none());
    }

    #[test]
    fn test_login_fails_before_register() {
        let (broker, gatekeeper) = fixture();
        let mut agent = Agent::new("alice", broker, gatekeeper);

        assert!(!agent.login());
        assert!(agent.session_key().is_none());
    }

    #[test]
    fn test_send_without_session_is_refused_locally() {
        let (broker, gatekeeper) = fixture();
        let agent = Agent::new("alice", broker, gatekeeper);

        // No record for "alice" exists, so a broker call would report
        // SOURCE_AGENT_DOES_NOT_EXIST; the local check fires first.
        assert_eq!(
            agent.send_message("bob", "hello"),
            DeliveryStatus::SourceAgentNotLoggedIn
        );
    }

    #[test]
    fn test_register_login_send_round_trip() {
        let (broker, gatekeeper) = fixture();

        let mut alice = Agent::new("alice", broker.clone(), gatekeeper.clone());
        assert!(alice.register());
        assert_eq!(alice.login_key().unwrap().chars().count(), 10);
        assert!(alice.login());
        assert_eq!(alice.session_key().unwrap().chars().count(), 50);

        // Bob registers but does not log in; he can still receive.
        let mut bob = Agent::new("bob", broker.clone(), gatekeeper);
        assert!(bob.register());
        assert_eq!(alice.send_message("bob", "hello"), DeliveryStatus::Ok);

        assert!(bob.login());
        let mut received = broker
            .get_next_message(bob.session_key().unwrap(), "bob")
            .unwrap();
        assert_eq!(received.source_id(), "alice");
        assert_eq!(received.target_id(), "bob");
        assert_eq!(received.body(broker.now()), Some("hello"));
    }

    #[test]
    fn test_restored_login_key_can_log_in() {
        let (broker, gatekeeper) = fixture();
        let mut first = Agent::new("alice", broker.clone(), gatekeeper.clone());
        assert!(first.register());
        let key = first.login_key().unwrap().to_string();

        let mut restored = Agent::with_login_key("alice", broker, gatekeeper, key);
        assert!(restored.login());
    }
}
