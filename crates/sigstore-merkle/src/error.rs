//! Inclusion proof failures

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Audit path length does not fit the tree shape
    #[error("malformed inclusion proof: {0}")]
    InvalidProof(String),

    #[error("bad tree size: {0}")]
    InvalidTreeSize(String),

    #[error("leaf index out of range: {0}")]
    InvalidLeafIndex(String),

    /// The audit path leads to a different root
    #[error("calculated root {actual} does not match expected root {expected}")]
    HashMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, Error>;
