//! Delivery status codes.

use serde::{Deserialize, Serialize};

/// Outcome of a send (or facade) operation.
///
/// The names are wire-stable: the presentation layer round-trips them through
/// cookies and must see the same identifiers the protocol documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Message delivered; counters incremented.
    Ok,
    /// Unknown recipient.
    TargetAgentDoesNotExist,
    /// Body longer than the configured maximum.
    MessageLengthExceeded,
    /// Both sender and recipient hit their quotas; both force-logged-out.
    BothAgentQuotasExceeded,
    /// Sender hit its send quota; sender force-logged-out.
    SourceAgentQuotaExceeded,
    /// Recipient hit its receive quota; recipient force-logged-out.
    TargetAgentQuotaExceeded,
    /// Unknown sender.
    SourceAgentDoesNotExist,
    /// Sender holds no live session.
    SourceAgentNotLoggedIn,
    /// Session key does not match the sender's live session.
    SessionKeyUnrecognized,
    /// Mailbox insert refused; indicates an invariant violation.
    FailedToAddToMailbox,
    /// Reserved for facade-level unexpected failure.
    GenericError,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Ok => "OK",
            DeliveryStatus::TargetAgentDoesNotExist => "TARGET_AGENT_DOES_NOT_EXIST",
            DeliveryStatus::MessageLengthExceeded => "MESSAGE_LENGTH_EXCEEDED",
            DeliveryStatus::BothAgentQuotasExceeded => "BOTH_AGENT_QUOTAS_EXCEEDED",
            DeliveryStatus::SourceAgentQuotaExceeded => "SOURCE_AGENT_QUOTA_EXCEEDED",
            DeliveryStatus::TargetAgentQuotaExceeded => "TARGET_AGENT_QUOTA_EXCEEDED",
            DeliveryStatus::SourceAgentDoesNotExist => "SOURCE_AGENT_DOES_NOT_EXIST",
            DeliveryStatus::SourceAgentNotLoggedIn => "SOURCE_AGENT_NOT_LOGGED_IN",
            DeliveryStatus::SessionKeyUnrecognized => "SESSION_KEY_UNRECOGNIZED",
            DeliveryStatus::FailedToAddToMailbox => "FAILED_TO_ADD_TO_MAILBOX",
            DeliveryStatus::GenericError => "GENERIC_ERROR",
        }
    }

    /// Parse a wire name back into a status.
    pub fn from_name(name: &str) -> Option<Self> {
        let status = match name {
            "OK" => DeliveryStatus::Ok,
            "TARGET_AGENT_DOES_NOT_EXIST" => DeliveryStatus::TargetAgentDoesNotExist,
            "MESSAGE_LENGTH_EXCEEDED" => DeliveryStatus::MessageLengthExceeded,
            "BOTH_AGENT_QUOTAS_EXCEEDED" => DeliveryStatus::BothAgentQuotasExceeded,
            "SOURCE_AGENT_QUOTA_EXCEEDED" => DeliveryStatus::SourceAgentQuotaExceeded,
            "TARGET_AGENT_QUOTA_EXCEEDED" => DeliveryStatus::TargetAgentQuotaExceeded,
            "SOURCE_AGENT_DOES_NOT_EXIST" => DeliveryStatus::SourceAgentDoesNotExist,
            "SOURCE_AGENT_NOT_LOGGED_IN" => DeliveryStatus::SourceAgentNotLoggedIn,
            "SESSION_KEY_UNRECOGNIZED" => DeliveryStatus::SessionKeyUnrecognized,
            "FAILED_TO_ADD_TO_MAILBOX" => DeliveryStatus::FailedToAddToMailbox,
            "GENERIC_ERROR" => DeliveryStatus::GenericError,
            _ => return None,
        };
        Some(status)
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
