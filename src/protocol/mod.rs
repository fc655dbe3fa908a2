//! Core messaging protocol for Courier.
//!
//! This module defines the building blocks the broker is assembled from:
//! - Time-boxed values with pull-based expiry
//! - Login and session credentials
//! - Timed messages and per-agent FIFO mailboxes
//! - The delivery status taxonomy

pub mod credential;
pub mod expiry;
pub mod mailbox;
pub mod message;
pub mod types;

pub use credential::{random_key, Credential};
pub use expiry::Expiring;
pub use mailbox::Mailbox;
pub use message::Message;
pub use types::DeliveryStatus;
