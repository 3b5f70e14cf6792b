//! Transparency log entry verification tests

mod common;

use common::*;
use sigstore_trust_root::TrustMaterial;
use sigstore_types::{CheckpointData, SignedTimestamp, TransparencyLogEntry};
use sigstore_verify::{verify_checkpoint, verify_inclusion, verify_tlog_entry, verify_tlog_set, ErrorCode};

fn entry(fx: &Fixture) -> TransparencyLogEntry {
    let body = hashedrekord_body(&[0xab; 32], &[1, 2, 3]);
    fx.tlog.entry("hashedrekord", "0.0.1", body, SIGNING_TIME)
}

fn with_checkpoint(mut entry: TransparencyLogEntry, envelope: String) -> TransparencyLogEntry {
    if let Some(proof) = entry.inclusion_proof.as_mut() {
        proof.checkpoint = CheckpointData { envelope };
    }
    entry
}

// ==== Complete Entries ====

#[test]
fn test_entry_with_promise_and_proof() {
    let fx = Fixture::new();
    verify_tlog_entry(&entry(&fx), &fx.material().tlogs).expect("entry should verify");
}

#[test]
fn test_entry_with_promise_only() {
    let fx = Fixture::new();
    let mut entry = entry(&fx);
    entry.inclusion_proof = None;
    verify_tlog_entry(&entry, &fx.material().tlogs).unwrap();
}

#[test]
fn test_entry_with_proof_only() {
    let fx = Fixture::new();
    let mut entry = entry(&fx);
    entry.inclusion_promise = None;
    verify_tlog_entry(&entry, &fx.material().tlogs).unwrap();
}

#[test]
fn test_entry_without_inclusion_evidence() {
    let fx = Fixture::new();
    let mut entry = entry(&fx);
    entry.inclusion_promise = None;
    entry.inclusion_proof = None;

    let err = verify_tlog_entry(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogMissingInclusion);
}

// ==== Inclusion Promise ====

#[test]
fn test_tampered_signed_entry_timestamp() {
    let fx = Fixture::new();
    let mut entry = entry(&fx);
    entry.integrated_time += 1;

    let err = verify_tlog_set(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionPromise);
}

#[test]
fn test_promise_signed_by_other_key() {
    let fx = Fixture::new();
    let mut entry = entry(&fx);
    let promise = sign(&key(70), b"not the payload");
    entry.inclusion_promise.as_mut().unwrap().signed_entry_timestamp =
        SignedTimestamp::new(promise);

    let err = verify_tlog_set(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionPromise);
}

#[test]
fn test_promise_from_log_outside_validity() {
    let fx = Fixture::new();
    let root = RootBuilder::default()
        .tlog(&fx.tlog.key, Some(SIGNING_TIME + 1), None)
        .build();
    let material = TrustMaterial::from_root(&root).unwrap();

    let err = verify_tlog_set(&entry(&fx), &material.tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionPromise);
}

#[test]
fn test_zero_integrated_time_is_the_epoch() {
    let fx = Fixture::new();
    let body = hashedrekord_body(&[0xab; 32], &[1, 2, 3]);
    let entry = fx.tlog.entry("hashedrekord", "0.0.1", body, 0);

    let windowed = RootBuilder::default()
        .tlog(&fx.tlog.key, Some(SIGNING_TIME + 1), Some(SIGNING_TIME + 10))
        .build();
    let windowed = TrustMaterial::from_root(&windowed).unwrap();
    let err = verify_tlog_set(&entry, &windowed.tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionPromise);
    let err = verify_checkpoint(&entry, &windowed.tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionProof);

    // Only a log trusted since the epoch covers it
    let unbounded = RootBuilder::default().tlog(&fx.tlog.key, None, None).build();
    let unbounded = TrustMaterial::from_root(&unbounded).unwrap();
    verify_tlog_entry(&entry, &unbounded.tlogs).unwrap();
}

// ==== Inclusion Proof ====

#[test]
fn test_proof_for_different_body() {
    let fx = Fixture::new();
    let mut entry = entry(&fx);
    let other = fx.tlog.inclusion_proof(b"some other body");
    entry.inclusion_proof = Some(other);

    let err = verify_inclusion(&entry).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionProof);
}

#[test]
fn test_checkpoint_root_mismatch() {
    let fx = Fixture::new();
    let envelope = fx.tlog.checkpoint(2, &[0x11; 32]);
    let entry = with_checkpoint(entry(&fx), envelope);

    verify_inclusion(&entry).expect("audit path itself is valid");
    let err = verify_checkpoint(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionProof);
    assert!(err.to_string().contains("does not match inclusion proof root hash"));
}

#[test]
fn test_checkpoint_unknown_key_hint() {
    let fx = Fixture::new();
    let entry = entry(&fx);
    let root = entry.inclusion_proof.as_ref().unwrap().root_hash;
    let envelope = fx
        .tlog
        .checkpoint_signed_by(&fx.tlog.key, [0xde, 0xad, 0xbe, 0xef], 2, root.as_slice());
    let entry = with_checkpoint(entry, envelope);

    let err = verify_checkpoint(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionProof);
}

#[test]
fn test_checkpoint_bad_signature() {
    let fx = Fixture::new();
    let entry = entry(&fx);
    let root = entry.inclusion_proof.as_ref().unwrap().root_hash;
    // Right hint, wrong key
    let envelope = fx
        .tlog
        .checkpoint_signed_by(&key(71), fx.tlog.key_hint(), 2, root.as_slice());
    let entry = with_checkpoint(entry, envelope);

    let err = verify_checkpoint(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionProof);
}

#[test]
fn test_checkpoint_malformed() {
    let fx = Fixture::new();
    let entry = with_checkpoint(entry(&fx), "not a signed note".to_string());

    let err = verify_checkpoint(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionProof);
}

#[test]
fn test_checkpoint_failure_fails_entry() {
    let fx = Fixture::new();
    let envelope = fx.tlog.checkpoint(2, &[0x22; 32]);
    let entry = with_checkpoint(entry(&fx), envelope);

    // The promise is valid, but the proof is checked as well
    verify_tlog_set(&entry, &fx.material().tlogs).unwrap();
    let err = verify_tlog_entry(&entry, &fx.material().tlogs).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TlogInclusionProof);
}
