//! Transparency log verification
//!
//! An entry can prove it was logged in two ways: a signed entry timestamp
//! (the log's promise to include it) and an inclusion proof anchored in a
//! signed checkpoint. Both are checked against the trusted log keys.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sigstore_crypto::SignedNote;
use sigstore_trust_root::{filter_tlog_authorities, TLogAuthority, TLogFilter};
use sigstore_types::TransparencyLogEntry;

/// Time the log recorded for this entry. A zero integrated time is the
/// epoch, which no windowed log or key covers.
pub(crate) fn integrated_time(entry: &TransparencyLogEntry) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(entry.integrated_time, 0).ok_or_else(|| {
        Error::Bundle(format!(
            "integrated time {} is out of range",
            entry.integrated_time
        ))
    })
}

/// Verify every form of inclusion evidence the entry carries.
///
/// An entry with neither a promise nor a proof cannot be trusted as a
/// timestamp and is rejected.
pub fn verify_tlog_entry(entry: &TransparencyLogEntry, tlogs: &[TLogAuthority]) -> Result<()> {
    if entry.inclusion_promise.is_none() && entry.inclusion_proof.is_none() {
        return Err(Error::MissingInclusion(format!(
            "log entry {} has neither an inclusion promise nor an inclusion proof",
            entry.log_index.value()
        )));
    }

    if entry.inclusion_promise.is_some() {
        verify_tlog_set(entry, tlogs)?;
    }

    if entry.inclusion_proof.is_some() {
        verify_inclusion(entry)?;
        verify_checkpoint(entry, tlogs)?;
    }

    Ok(())
}

#[derive(Serialize)]
struct RekorPayload {
    body: String,
    #[serde(rename = "integratedTime")]
    integrated_time: i64,
    #[serde(rename = "logIndex")]
    log_index: i64,
    #[serde(rename = "logID")]
    log_id: String,
}

/// Verify the SET (Signed Entry Timestamp) of an entry.
///
/// The promise must verify under the key of at least one log with the
/// entry's log ID that was valid at the integrated time.
pub fn verify_tlog_set(entry: &TransparencyLogEntry, tlogs: &[TLogAuthority]) -> Result<()> {
    let promise = entry
        .inclusion_promise
        .as_ref()
        .ok_or_else(|| Error::InclusionPromise("missing inclusion promise".to_string()))?;

    let log_id = entry.log_id.key_id.as_bytes();
    let logs = filter_tlog_authorities(
        tlogs,
        TLogFilter {
            log_id: Some(log_id),
            target_date: Some(integrated_time(entry)?),
        },
    );
    if logs.is_empty() {
        tracing::warn!("no trusted log key for log ID {}", hex::encode(log_id));
    }

    let log_index = i64::try_from(entry.log_index.value())
        .map_err(|_| Error::InclusionPromise("log index out of range".to_string()))?;
    let payload = RekorPayload {
        body: entry.canonicalized_body.to_base64(),
        integrated_time: entry.integrated_time,
        log_index,
        log_id: hex::encode(log_id),
    };
    let canonical_json = serde_json_canonicalizer::to_vec(&payload)
        .map_err(|e| Error::InclusionPromise(format!("canonicalization failed: {}", e)))?;

    let signature = promise.signed_entry_timestamp.as_bytes();
    let verified = logs
        .iter()
        .any(|log| log.key.verify(&canonical_json, signature).is_ok());
    if !verified {
        return Err(Error::InclusionPromise(format!(
            "signed entry timestamp for log index {} could not be verified",
            entry.log_index.value()
        )));
    }

    Ok(())
}

/// Recompute the Merkle root from the entry body and its audit path
pub fn verify_inclusion(entry: &TransparencyLogEntry) -> Result<()> {
    let proof = entry
        .inclusion_proof
        .as_ref()
        .ok_or_else(|| Error::InclusionProof("missing inclusion proof".to_string()))?;

    let tree_size = u64::try_from(proof.tree_size)
        .map_err(|_| Error::InclusionProof(format!("invalid tree size {}", proof.tree_size)))?;
    let leaf_hash = sigstore_merkle::hash_leaf(entry.canonicalized_body.as_bytes());

    sigstore_merkle::verify_inclusion_proof(
        &leaf_hash,
        proof.log_index.value(),
        tree_size,
        &proof.hashes,
        &proof.root_hash,
    )
    .map_err(|e| Error::InclusionProof(e.to_string()))
}

/// Verify the signed checkpoint of an entry's inclusion proof.
///
/// Logs are filtered by time only since witnesses may co-sign a checkpoint.
/// Every signature on the note must verify under a log whose key hint it
/// names, and the checkpoint must commit to the proof's root hash.
pub fn verify_checkpoint(entry: &TransparencyLogEntry, tlogs: &[TLogAuthority]) -> Result<()> {
    let proof = entry
        .inclusion_proof
        .as_ref()
        .ok_or_else(|| Error::InclusionProof("missing inclusion proof".to_string()))?;

    let note = SignedNote::from_text(&proof.checkpoint.envelope)
        .map_err(|e| Error::InclusionProof(format!("invalid checkpoint: {}", e)))?;

    let logs = filter_tlog_authorities(
        tlogs,
        TLogFilter {
            log_id: None,
            target_date: Some(integrated_time(entry)?),
        },
    );

    let signed_data = note.signed_data();
    for signature in &note.signatures {
        let verified = logs
            .iter()
            .filter(|log| log.key_hint() == Some(signature.key_hint))
            .any(|log| log.key.verify(&signed_data, &signature.signature).is_ok());
        if !verified {
            return Err(Error::InclusionProof(format!(
                "checkpoint signature from {} could not be verified",
                signature.name
            )));
        }
    }

    let checkpoint = note
        .checkpoint()
        .map_err(|e| Error::InclusionProof(format!("invalid checkpoint: {}", e)))?;
    if checkpoint.root_hash != proof.root_hash.as_slice() {
        return Err(Error::InclusionProof(format!(
            "checkpoint root hash {} does not match inclusion proof root hash {}",
            hex::encode(&checkpoint.root_hash),
            proof.root_hash.to_hex()
        )));
    }

    Ok(())
}
