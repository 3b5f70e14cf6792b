//! Failures loading a trusted root or building trust material from it

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("trusted root is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read trusted root: {0}")]
    Io(#[from] std::io::Error),

    /// An authority's chain is empty or holds an undecodable certificate
    #[error("certificate authority {authority:?}: {reason}")]
    Certificate { authority: String, reason: String },

    #[error("log {log:?} has an unusable public key: {reason}")]
    InvalidKey { log: String, reason: String },

    #[error("invalid RFC 3339 time {value:?}: {reason}")]
    TimeParse { value: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
