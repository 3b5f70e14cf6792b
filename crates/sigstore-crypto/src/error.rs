//! Cryptographic failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The signature does not verify under the key
    #[error("bad signature: {0}")]
    Verification(String),

    #[error("malformed public key: {0}")]
    InvalidKeyFormat(String),

    /// Key type, curve or signature algorithm outside the supported set
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("DER decoding failed: {0}")]
    Der(#[from] der::Error),

    /// Signed note could not be parsed or verified
    #[error("checkpoint: {0}")]
    Checkpoint(String),

    #[error("malformed certificate: {0}")]
    InvalidCertificate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
