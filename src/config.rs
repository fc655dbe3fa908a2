//! Configuration loading for Courier.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use chrono::Duration;

use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!%^&*()";

/// Get the Courier home directory (~/.courier).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".courier"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from ~/.courier/settings.json
pub fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;

    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}. Run 'courier setup' first.",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings or return default if not found.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings: {}, using defaults", e);
        Settings::default()
    })
}

/// Write settings to ~/.courier/settings.json.
pub fn save_settings(settings: &Settings) -> Result<PathBuf> {
    let path = get_settings_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(settings)?)?;
    Ok(path)
}

/// Broker limits and protocol constants.
///
/// Every field is adjustable through the settings file; the defaults are the
/// protocol's documented values.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BrokerLimits {
    /// Login key length in characters.
    #[serde(default = "default_login_key_length")]
    pub login_key_length: usize,

    /// Session key length in characters.
    #[serde(default = "default_session_key_length")]
    pub session_key_length: usize,

    /// Seconds a login key stays usable after issuance.
    #[serde(default = "default_login_key_ttl_secs")]
    pub login_key_ttl_secs: u64,

    /// Seconds a session key stays usable after issuance.
    #[serde(default = "default_session_key_ttl_secs")]
    pub session_key_ttl_secs: u64,

    /// Seconds a message stays readable after sending.
    #[serde(default = "default_message_ttl_secs")]
    pub message_ttl_secs: u64,

    /// Maximum message body length in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Messages an agent may send in one session before forced logout.
    #[serde(default = "default_max_messages_sent")]
    pub max_messages_sent: u32,

    /// Messages an agent may receive in one session before forced logout.
    #[serde(default = "default_max_messages_recv")]
    pub max_messages_recv: u32,

    /// Words stripped from message bodies before delivery.
    #[serde(default = "default_blocked_words")]
    pub blocked_words: Vec<String>,

    /// Alphabet keys are drawn from.
    #[serde(default = "default_key_alphabet")]
    pub key_alphabet: String,
}

fn default_login_key_length() -> usize {
    10
}

fn default_session_key_length() -> usize {
    50
}

fn default_login_key_ttl_secs() -> u64 {
    60
}

fn default_session_key_ttl_secs() -> u64 {
    600
}

fn default_message_ttl_secs() -> u64 {
    1800
}

fn default_max_message_length() -> usize {
    140
}

fn default_max_messages_sent() -> u32 {
    25
}

fn default_max_messages_recv() -> u32 {
    25
}

fn default_blocked_words() -> Vec<String> {
    vec![
        "recipe".to_string(),
        "ginger".to_string(),
        "nuclear".to_string(),
    ]
}

fn default_key_alphabet() -> String {
    format!("{}{}{}{}", UPPER, LOWER, DIGITS, SYMBOLS)
}

impl Default for BrokerLimits {
    fn default() -> Self {
        Self {
            login_key_length: default_login_key_length(),
            session_key_length: default_session_key_length(),
            login_key_ttl_secs: default_login_key_ttl_secs(),
            session_key_ttl_secs: default_session_key_ttl_secs(),
            message_ttl_secs: default_message_ttl_secs(),
            max_message_length: default_max_message_length(),
            max_messages_sent: default_max_messages_sent(),
            max_messages_recv: default_max_messages_recv(),
            blocked_words: default_blocked_words(),
            key_alphabet: default_key_alphabet(),
        }
    }
}

impl BrokerLimits {
    pub fn login_key_ttl(&self) -> Duration {
        Duration::seconds(self.login_key_ttl_secs as i64)
    }

    pub fn session_key_ttl(&self) -> Duration {
        Duration::seconds(self.session_key_ttl_secs as i64)
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::seconds(self.message_ttl_secs as i64)
    }
}

/// Gatekeeper policy configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GatekeeperSettings {
    /// Agent id prefixes refused at registration.
    #[serde(default = "default_denied_prefixes")]
    pub denied_prefixes: Vec<String>,
}

fn default_denied_prefixes() -> Vec<String> {
    vec!["spy-".to_string()]
}

impl Default for GatekeeperSettings {
    fn default() -> Self {
        Self {
            denied_prefixes: default_denied_prefixes(),
        }
    }
}

/// Web screen configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WebSettings {
    #[serde(default = "default_web_host")]
    pub host: String,

    #[serde(default = "default_web_port")]
    pub port: u16,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

/// Courier settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub broker: BrokerLimits,

    #[serde(default)]
    pub gatekeeper: GatekeeperSettings,

    #[serde(default)]
    pub web: WebSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_match_protocol_constants() {
        let limits = BrokerLimits::default();

        assert_eq!(limits.login_key_length, 10);
        assert_eq!(limits.session_key_length, 50);
        assert_eq!(limits.login_key_ttl(), Duration::minutes(1));
        assert_eq!(limits.session_key_ttl(), Duration::minutes(10));
        assert_eq!(limits.message_ttl(), Duration::minutes(30));
        assert_eq!(limits.max_message_length, 140);
        assert_eq!(limits.max_messages_sent, 25);
        assert_eq!(limits.max_messages_recv, 25);
        assert_eq!(limits.blocked_words, vec!["recipe", "ginger", "nuclear"]);
    }

    #[test]
    fn test_default_alphabet_covers_all_groups() {
        let alphabet = default_key_alphabet();

        assert_eq!(alphabet.len(), 26 + 26 + 10 + 7);
        assert!(alphabet.contains('A'));
        assert!(alphabet.contains('z'));
        assert!(alphabet.contains('0'));
        assert!(alphabet.contains('!'));
    }

    #[test]
    fn test_empty_settings_file_deserializes_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings.broker.login_key_length, 10);
        assert_eq!(settings.gatekeeper.denied_prefixes, vec!["spy-"]);
        assert_eq!(settings.web.port, 8080);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"broker": {"max_message_length": 280}}"#).unwrap();

        assert_eq!(settings.broker.max_message_length, 280);
        assert_eq!(settings.broker.session_key_length, 50);
    }

    #[test]
    fn test_settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.broker.blocked_words.push("classified".to_string());
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert!(loaded
            .broker
            .blocked_words
            .contains(&"classified".to_string()));
    }
}
