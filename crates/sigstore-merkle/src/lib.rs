//! Merkle tree inclusion proofs for transparency logs
//!
//! A log entry proves membership with an audit path from its leaf to a
//! tree root. The root recomputed here is later compared with the one a
//! signed checkpoint commits to.

pub mod error;
pub mod proof;
pub mod tree;

pub use error::{Error, Result};
pub use proof::{root_from_inclusion_proof, verify_inclusion_proof};
pub use tree::{hash_children, hash_leaf};
