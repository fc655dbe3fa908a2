//! Courier library root.

pub mod agent;
pub mod broker;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod gatekeeper;
pub mod logging;
pub mod protocol;
pub mod web;

pub use agent::Agent;
pub use broker::Broker;
pub use cli::Commands;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_settings, BrokerLimits, Settings};
pub use error::{Error, Result};
pub use gatekeeper::{Gatekeeper, PrefixGatekeeper};
pub use protocol::{Credential, DeliveryStatus, Expiring, Mailbox, Message};
