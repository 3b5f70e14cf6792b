//! Error types for sigstore-verify

use thiserror::Error;

/// Stable code identifying which part of verification failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Certificate,
    PublicKey,
    TlogInclusionPromise,
    TlogInclusionProof,
    Timestamp,
    TlogMissingInclusion,
    TlogBody,
    Signature,
    Bundle,
    TrustRoot,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Certificate => "CERTIFICATE_ERROR",
            ErrorCode::PublicKey => "PUBLIC_KEY_ERROR",
            ErrorCode::TlogInclusionPromise => "TLOG_INCLUSION_PROMISE_ERROR",
            ErrorCode::TlogInclusionProof => "TLOG_INCLUSION_PROOF_ERROR",
            ErrorCode::Timestamp => "TIMESTAMP_ERROR",
            ErrorCode::TlogMissingInclusion => "TLOG_MISSING_INCLUSION_ERROR",
            ErrorCode::TlogBody => "TLOG_BODY_ERROR",
            ErrorCode::Signature => "SIGNATURE_ERROR",
            ErrorCode::Bundle => "BUNDLE_ERROR",
            ErrorCode::TrustRoot => "TRUST_ROOT_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during verification
///
/// Every error is terminal: verification either produces a fully verified
/// entity or one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// Certificate chain, SCT or signer certificate could not be trusted
    #[error("Certificate verification failed: {message}")]
    Certificate {
        message: String,
        /// Failure of the last candidate authority tried, if any
        #[source]
        cause: Option<Box<Error>>,
    },

    /// Public key hint unknown or key not valid at a timestamp
    #[error("Public key verification failed: {0}")]
    PublicKey(String),

    /// Signed entry timestamp did not verify against any log
    #[error("Inclusion promise verification failed: {0}")]
    InclusionPromise(String),

    /// Inclusion proof or checkpoint did not verify
    #[error("Inclusion proof verification failed: {0}")]
    InclusionProof(String),

    /// RFC 3161 timestamp did not verify against any authority
    #[error("Timestamp verification failed: {message}")]
    Timestamp {
        message: String,
        #[source]
        cause: Option<Box<Error>>,
    },

    /// Transparency log evidence is missing
    #[error("Missing transparency log inclusion: {0}")]
    MissingInclusion(String),

    /// Transparency log body disagrees with the bundle content
    #[error("Transparency log body mismatch: {0}")]
    TlogBody(String),

    /// Artifact or envelope signature is invalid
    #[error("Signature verification failed: {0}")]
    Signature(String),

    /// Bundle lacks required material or is malformed
    #[error("Invalid bundle: {0}")]
    Bundle(String),

    /// Trust material could not be built
    #[error("Invalid trust root: {0}")]
    TrustRoot(#[from] sigstore_trust_root::Error),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Certificate { .. } => ErrorCode::Certificate,
            Error::PublicKey(_) => ErrorCode::PublicKey,
            Error::InclusionPromise(_) => ErrorCode::TlogInclusionPromise,
            Error::InclusionProof(_) => ErrorCode::TlogInclusionProof,
            Error::Timestamp { .. } => ErrorCode::Timestamp,
            Error::MissingInclusion(_) => ErrorCode::TlogMissingInclusion,
            Error::TlogBody(_) => ErrorCode::TlogBody,
            Error::Signature(_) => ErrorCode::Signature,
            Error::Bundle(_) => ErrorCode::Bundle,
            Error::TrustRoot(_) => ErrorCode::TrustRoot,
        }
    }

    pub(crate) fn certificate(message: impl Into<String>) -> Self {
        Error::Certificate {
            message: message.into(),
            cause: None,
        }
    }

    pub(crate) fn timestamp(message: impl Into<String>) -> Self {
        Error::Timestamp {
            message: message.into(),
            cause: None,
        }
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
