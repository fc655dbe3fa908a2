//! Clearance policy for issuing login keys.

use std::sync::Arc;

use crate::broker::Broker;
use crate::protocol::random_key;

/// Redraws allowed when a drawn key collides with a live one.
const DRAW_ATTEMPTS: usize = 3;

/// The capability consulted before an agent may register.
///
/// Implementations decide whether the id is acceptable and, if so, hand back
/// a login key that is already registered with the broker. Any policy can be
/// swapped in here.
pub trait Gatekeeper: Send + Sync {
    /// Issue a login key for the agent, or refuse.
    fn issue_login_key(&self, agent_id: &str) -> Option<String>;
}

/// Refuses agent ids carrying any of the configured prefixes; clears everyone
/// else by drawing a random key and registering it with the broker.
pub struct PrefixGatekeeper {
    broker: Arc<Broker>,
    denied_prefixes: Vec<String>,
}

impl PrefixGatekeeper {
    pub fn new(broker: Arc<Broker>, denied_prefixes: Vec<String>) -> Self {
        Self {
            broker,
            denied_prefixes,
        }
    }
}

impl Gatekeeper for PrefixGatekeeper {
    fn issue_login_key(&self, agent_id: &str) -> Option<String> {
        if self
            .denied_prefixes
            .iter()
            .any(|prefix| agent_id.starts_with(prefix))
        {
            tracing::warn!(agent = agent_id, "registration denied by gatekeeper");
            return None;
        }

        let limits = self.broker.limits();
        // The broker enforces uniqueness among live login keys, so a draw can
        // lose to a concurrent holder of the same value; redraw a few times.
        for _ in 0..DRAW_ATTEMPTS {
            let key = random_key(limits.login_key_length, &limits.key_alphabet);
            if self.broker.register_login_key(agent_id, &key) {
                return Some(key);
            }
        }

        tracing::error!(agent = agent_id, "could not draw a unique login key");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrokerLimits;

    fn gatekeeper() -> PrefixGatekeeper {
        let broker = Arc::new(Broker::new(BrokerLimits::default()));
        PrefixGatekeeper::new(broker, vec!["spy-".to_string()])
    }

    #[test]
    fn test_denied_prefix_is_refused() {
        let gatekeeper = gatekeeper();

        assert!(gatekeeper.issue_login_key("spy-007").is_none());
    }

    #[test]
    fn test_cleared_agent_gets_registered_key() {
        let broker = Arc::new(Broker::new(BrokerLimits::default()));
        let gatekeeper = PrefixGatekeeper::new(broker.clone(), vec!["spy-".to_string()]);

        let key = gatekeeper.issue_login_key("alice").unwrap();

        assert_eq!(key.chars().count(), 10);
        // The key is live in the broker: logging in with it works.
        assert!(broker.login("alice", &key).is_some());
    }

    #[test]
    fn test_exhausted_alphabet_eventually_refuses() {
        // One-character alphabet and length 1: only one possible key, so a
        // second agent cannot be issued a unique one while it is live.
        let limits = BrokerLimits {
            login_key_length: 1,
            key_alphabet: "a".to_string(),
            ..BrokerLimits::default()
        };
        let broker = Arc::new(Broker::new(limits));
        let gatekeeper = PrefixGatekeeper::new(broker, Vec::new());

        assert!(gatekeeper.issue_login_key("alice").is_some());
        assert!(gatekeeper.issue_login_key("bob").is_none());
    }
}
