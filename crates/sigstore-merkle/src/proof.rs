//! Inclusion proof verification, RFC 9162 section 2.1.3.2

use crate::error::{Error, Result};
use crate::tree::hash_children;
use sigstore_types::Sha256Hash;

/// Fold the audit path into the leaf hash and return the root it implies.
///
/// `proof_hashes` runs from the leaf towards the root. The path must have
/// exactly the length the tree shape calls for.
pub fn root_from_inclusion_proof(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    tree_size: u64,
    proof_hashes: &[Sha256Hash],
) -> Result<Sha256Hash> {
    if tree_size == 0 {
        return Err(Error::InvalidTreeSize("empty tree".to_string()));
    }
    if leaf_index >= tree_size {
        return Err(Error::InvalidLeafIndex(format!(
            "leaf {} in tree of size {}",
            leaf_index, tree_size
        )));
    }

    // `node` walks up from the leaf, `last` from the rightmost leaf
    let mut node = leaf_index;
    let mut last = tree_size - 1;
    let mut root = *leaf_hash;

    for (depth, sibling) in proof_hashes.iter().enumerate() {
        if last == 0 {
            return Err(Error::InvalidProof(format!(
                "{} hashes given, path is complete after {}",
                proof_hashes.len(),
                depth
            )));
        }
        if node & 1 == 1 || node == last {
            root = hash_children(sibling, &root);
            // Right edge: levels without a left sibling are skipped
            while node & 1 == 0 && node != 0 {
                node >>= 1;
                last >>= 1;
            }
        } else {
            root = hash_children(&root, sibling);
        }
        node >>= 1;
        last >>= 1;
    }

    if last != 0 {
        return Err(Error::InvalidProof(format!(
            "path of {} hashes ends below the root",
            proof_hashes.len()
        )));
    }
    Ok(root)
}

pub fn verify_inclusion_proof(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    tree_size: u64,
    proof_hashes: &[Sha256Hash],
    expected_root: &Sha256Hash,
) -> Result<()> {
    let root = root_from_inclusion_proof(leaf_hash, leaf_index, tree_size, proof_hashes)?;
    if root == *expected_root {
        Ok(())
    } else {
        Err(Error::HashMismatch {
            expected: expected_root.to_hex(),
            actual: root.to_hex(),
        })
    }
}
