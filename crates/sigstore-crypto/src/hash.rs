//! Message digests

use aws_lc_rs::digest::{digest, Algorithm, SHA256, SHA384, SHA512};
use sigstore_types::{HashAlgorithm, Sha256Hash};

fn lc_algorithm(algorithm: HashAlgorithm) -> &'static Algorithm {
    match algorithm {
        HashAlgorithm::Sha2256 => &SHA256,
        HashAlgorithm::Sha2384 => &SHA384,
        HashAlgorithm::Sha2512 => &SHA512,
    }
}

/// Digest `data` with `algorithm`; the output is `algorithm.digest_size()` bytes
pub fn hash(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    digest(lc_algorithm(algorithm), data).as_ref().to_vec()
}

pub fn sha256(data: &[u8]) -> Sha256Hash {
    let mut out = [0u8; 32];
    out.copy_from_slice(digest(&SHA256, data).as_ref());
    Sha256Hash::from_bytes(out)
}
