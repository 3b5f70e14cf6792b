//! Errors raised while decoding bundle documents

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed bundle JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A base64 or hex field did not decode
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("unrecognized bundle media type {0:?}")]
    InvalidMediaType(String),
}

pub type Result<T> = std::result::Result<T, Error>;
