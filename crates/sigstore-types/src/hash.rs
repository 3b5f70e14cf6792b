//! Digest algorithms
//!
//! Bundles name digests with protobuf enum names (`SHA2_256`), while
//! transparency log entry bodies use lower-case names (`sha256`). Both
//! spellings map onto [`HashAlgorithm`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA2_256")]
    Sha2256,
    #[serde(rename = "SHA2_384")]
    Sha2384,
    #[serde(rename = "SHA2_512")]
    Sha2512,
}

impl HashAlgorithm {
    /// Name used in bundle and trusted root documents
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha2256 => "SHA2_256",
            HashAlgorithm::Sha2384 => "SHA2_384",
            HashAlgorithm::Sha2512 => "SHA2_512",
        }
    }

    /// Name used inside log entry bodies
    pub fn log_name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha2256 => "sha256",
            HashAlgorithm::Sha2384 => "sha384",
            HashAlgorithm::Sha2512 => "sha512",
        }
    }

    /// Parse a log entry body algorithm name
    pub fn from_log_name(name: &str) -> Option<Self> {
        [Self::Sha2256, Self::Sha2384, Self::Sha2512]
            .into_iter()
            .find(|alg| alg.log_name().eq_ignore_ascii_case(name))
    }

    pub fn digest_size(self) -> usize {
        match self {
            HashAlgorithm::Sha2256 => 32,
            HashAlgorithm::Sha2384 => 48,
            HashAlgorithm::Sha2512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
