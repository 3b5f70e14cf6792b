//! RFC 6962 node hashing
//!
//! Leaves and interior nodes are hashed under different one-byte prefixes
//! so that a leaf can never be passed off as an interior node.

use sha2::{Digest, Sha256};
use sigstore_types::Sha256Hash;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

fn prefixed_hash(prefix: u8, parts: &[&[u8]]) -> Sha256Hash {
    let hasher = parts
        .iter()
        .fold(Sha256::new().chain_update([prefix]), |h, part| {
            h.chain_update(part)
        });
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Hash of a log entry's canonicalized body
pub fn hash_leaf(data: &[u8]) -> Sha256Hash {
    prefixed_hash(LEAF_PREFIX, &[data])
}

pub fn hash_children(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    prefixed_hash(NODE_PREFIX, &[left.as_bytes(), right.as_bytes()])
}
