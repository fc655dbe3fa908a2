//! Time-limited string secrets: login keys and session keys.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::expiry::Expiring;

/// A string secret valid until an absolute expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    secret: Expiring<String>,
}

impl Credential {
    pub fn new(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret: Expiring::new(secret.into(), expires_at),
        }
    }

    /// An already-expired placeholder. Fresh agent records start with one of
    /// these for both keys, and logout installs one over the session key.
    pub fn expired(now: DateTime<Utc>) -> Self {
        Self {
            secret: Expiring::expired(now),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.secret.is_expired(now)
    }

    /// True iff the credential is not expired and its secret equals
    /// `candidate`. Expired credentials match nothing, including their own
    /// former secret.
    pub fn matches(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        self.secret.peek(now).map(String::as_str) == Some(candidate)
    }

    /// Read the secret, or absent once expired (irreversibly).
    pub fn reveal(&mut self, now: DateTime<Utc>) -> Option<&str> {
        self.secret.get(now).map(String::as_str)
    }
}

/// Draw a key of `length` characters uniformly from `alphabet`.
///
/// Sampling is not cryptographic; uniqueness of login keys is enforced by the
/// broker at registration, never assumed from randomness.
pub fn random_key(length: usize, alphabet: &str) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ALPHABET: &str = "abcXYZ019!%";

    #[test]
    fn test_matches_while_live() {
        let now = Utc::now();
        let credential = Credential::new("k3y", now + Duration::minutes(1));

        assert!(credential.matches("k3y", now));
        assert!(!credential.matches("other", now));
    }

    #[test]
    fn test_matches_nothing_once_expired() {
        let now = Utc::now();
        let credential = Credential::new("k3y", now + Duration::minutes(1));

        assert!(!credential.matches("k3y", now + Duration::minutes(1)));
    }

    #[test]
    fn test_reveal_forgets_after_expiry() {
        let now = Utc::now();
        let mut credential = Credential::new("k3y", now + Duration::minutes(1));

        assert_eq!(credential.reveal(now), Some("k3y"));
        assert_eq!(credential.reveal(now + Duration::minutes(2)), None);
        assert_eq!(credential.reveal(now), None);
    }

    #[test]
    fn test_expired_placeholder_never_matches() {
        let now = Utc::now();
        let credential = Credential::expired(now);

        assert!(credential.is_expired(now));
        assert!(!credential.matches("", now));
    }

    #[test]
    fn test_random_key_length_and_alphabet() {
        let key = random_key(50, ALPHABET);

        assert_eq!(key.chars().count(), 50);
        assert!(key.chars().all(|c| ALPHABET.contains(c)));
    }

    #[test]
    fn test_random_keys_differ() {
        // 62^10 possibilities; a collision here means the sampler is broken.
        let a = random_key(10, ALPHABET);
        let b = random_key(10, ALPHABET);

        assert_ne!(a, b);
    }
}
