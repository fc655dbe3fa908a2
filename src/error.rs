//! Error types for Courier.
//!
//! These cover infrastructure failures only (config, IO, serving). Protocol
//! outcomes are never errors: the broker reports them as `DeliveryStatus`
//! codes or absent values.
#![allow(dead_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Web error: {0}")]
    Web(String),

    #[error("{0}")]
    Other(String),
}
