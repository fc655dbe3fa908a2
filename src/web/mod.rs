//! Built-in web screens (Axum).
//!
//! A thin HTML front over the broker and the agent facade: register, login,
//! mailbox, send, read, logout. Credentials live in cookies on the client;
//! every protocol decision is delegated to the broker.

pub mod cookies;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod server;

pub use handlers::AppState;
pub use server::{run_server, WebServerConfig};
