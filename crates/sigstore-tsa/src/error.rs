//! Timestamp token failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// DER or CMS structure could not be decoded
    #[error("malformed timestamp token: {0}")]
    Parse(String),

    /// `TimeStampResp` with a status other than granted
    #[error("timestamp authority refused the request (status {0})")]
    ResponseFailure(u8),

    #[error("signed data carries no TSTInfo")]
    NoTstInfo,

    #[error("digest mismatch: token commits to {expected}, data hashes to {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("timestamp signature invalid: {0}")]
    SignatureVerification(String),

    #[error("signer certificate lacks the timeStamping extended key usage")]
    InvalidEku,
}

pub type Result<T> = std::result::Result<T, Error>;
