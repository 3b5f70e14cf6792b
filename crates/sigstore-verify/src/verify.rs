//! High-level verification API
//!
//! This module provides the main entry point for verifying Sigstore bundles
//! against a set of trust material.

use crate::error::{Error, Result};
use crate::verify_impl::{
    body::verify_tlog_body,
    content::SignatureContent,
    key::{verify_certificate, verify_public_key},
    timestamp::verify_rfc3161_timestamp,
    tlog::{integrated_time, verify_tlog_entry},
};
use chrono::{DateTime, Utc};
use sigstore_crypto::{Certificate, VerificationKey};
use sigstore_trust_root::{KeyResolver, TrustMaterial, TrustedRoot};
use sigstore_tsa::ParsedTimestamp;
use sigstore_types::{Bundle, TransparencyLogEntry, VerificationMaterialContent};

/// How much independent evidence a bundle must carry
///
/// Thresholds count verified items. With the default of zero everywhere,
/// every attestation present must verify but none is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifierOptions {
    /// Verified transparency log entries required
    pub tlog_threshold: usize,
    /// Verified SCTs required for certificate signers
    pub ctlog_threshold: usize,
    /// Verified RFC 3161 timestamps required
    pub tsa_threshold: usize,
    /// Verified timestamps of any kind required for certificate signers
    pub timestamp_threshold: usize,
}

impl VerifierOptions {
    /// Thresholds suitable for the public-good Sigstore instance
    pub fn recommended() -> Self {
        Self {
            tlog_threshold: 1,
            ctlog_threshold: 1,
            tsa_threshold: 0,
            timestamp_threshold: 1,
        }
    }

    pub fn with_tlog_threshold(mut self, threshold: usize) -> Self {
        self.tlog_threshold = threshold;
        self
    }

    pub fn with_ctlog_threshold(mut self, threshold: usize) -> Self {
        self.ctlog_threshold = threshold;
        self
    }

    pub fn with_tsa_threshold(mut self, threshold: usize) -> Self {
        self.tsa_threshold = threshold;
        self
    }

    pub fn with_timestamp_threshold(mut self, threshold: usize) -> Self {
        self.timestamp_threshold = threshold;
        self
    }
}

/// Key material a bundle was signed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A key known to the verifier out of band
    PublicKey { hint: String },
    /// A signing certificate, usually short-lived
    Certificate(Certificate),
}

impl Key {
    fn from_bundle(content: &VerificationMaterialContent) -> Result<Self> {
        if let Some(hint) = content.public_key_hint() {
            return Ok(Key::PublicKey {
                hint: hint.to_string(),
            });
        }
        let der = content
            .leaf_certificate()
            .ok_or_else(|| Error::Bundle("empty certificate chain".to_string()))?;
        let cert = Certificate::from_der(der.as_bytes())
            .map_err(|e| Error::Bundle(format!("invalid signing certificate: {}", e)))?;
        Ok(Key::Certificate(cert))
    }
}

/// Identity of a certificate signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    pub key: VerificationKey,
    /// Email or URI subject alternative name
    pub identity: Option<String>,
    /// OIDC issuer recorded in the certificate
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKind {
    TransparencyLog,
    TimestampAuthority,
}

/// A point in time vouched for by a verified attestation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTimestamp {
    pub kind: TimestampKind,
    pub time: DateTime<Utc>,
    /// Log that recorded the time, for transparency log timestamps
    pub log_id: Option<Vec<u8>>,
}

/// A bundle whose signature, key and attestations have all been verified
#[derive(Debug, Clone)]
pub struct SignedEntity {
    pub signature: SignatureContent,
    pub key: Key,
    pub tlog_entries: Vec<TransparencyLogEntry>,
    pub timestamps: Vec<VerifiedTimestamp>,
    /// Signer identity when the key is a certificate
    pub signer: Option<Signer>,
    /// IDs of the CT logs whose SCTs verified
    pub scts: Vec<Vec<u8>>,
}

/// Evidence that the signature existed at some point in time
enum TimestampAttestation<'a> {
    TransparencyLog(&'a TransparencyLogEntry),
    TimestampAuthority(ParsedTimestamp),
}

impl TimestampAttestation<'_> {
    fn time(&self) -> Result<DateTime<Utc>> {
        match self {
            TimestampAttestation::TransparencyLog(entry) => integrated_time(entry),
            TimestampAttestation::TimestampAuthority(token) => Ok(token.time()),
        }
    }
}

/// A verifier for Sigstore bundles
///
/// The trust material is built once and shared read-only by every
/// verification.
#[derive(Debug, Clone)]
pub struct Verifier {
    material: TrustMaterial,
    options: VerifierOptions,
}

impl Verifier {
    pub fn new(material: TrustMaterial, options: VerifierOptions) -> Self {
        Self { material, options }
    }

    /// Build the trust material from a trusted root document
    pub fn from_trusted_root(
        root: &TrustedRoot,
        resolver: impl KeyResolver + 'static,
        options: VerifierOptions,
    ) -> Result<Self> {
        let material = TrustMaterial::build(root, resolver)?;
        Ok(Self::new(material, options))
    }

    pub fn trust_material(&self) -> &TrustMaterial {
        &self.material
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    /// Verify a bundle, and the artifact for message signature bundles.
    ///
    /// In order to trust the signature, we need to achieve the following:
    ///
    /// 0. Derive the signature content and key material from the bundle.
    /// 1. Collect the timestamps claimed by log entries and RFC 3161 tokens.
    /// 2. Verify that the key was trusted at every one of those times: the
    ///    hinted key is valid, or the certificate chains to a trusted CA at
    ///    each time and its SCTs verify.
    /// 3. Verify every log entry's inclusion promise and inclusion proof.
    /// 4. Verify every RFC 3161 token against the timestamp authorities.
    /// 5. Check that log entries record this bundle's content.
    /// 6. Enforce the configured evidence thresholds.
    /// 7. Verify the signature with the trusted key.
    ///
    /// Nothing is returned unless every step succeeds.
    pub fn verify(&self, bundle: &Bundle, artifact: Option<&[u8]>) -> Result<SignedEntity> {
        // (0)
        let content = SignatureContent::from_bundle(&bundle.content, artifact)?;
        let key = Key::from_bundle(&bundle.verification_material.content)?;

        // (1)
        let attestations = collect_attestations(bundle)?;
        let times = attestations
            .iter()
            .map(TimestampAttestation::time)
            .collect::<Result<Vec<_>>>()?;

        // (2)
        let (verification_key, signer, scts) = match &key {
            Key::PublicKey { hint } => {
                (verify_public_key(hint, &times, &self.material)?, None, Vec::new())
            }
            Key::Certificate(leaf) => {
                let trust = verify_certificate(leaf, &times, &self.material)?;
                (trust.signer.key.clone(), Some(trust.signer), trust.scts)
            }
        };

        // (3) and (4)
        let mut timestamps = Vec::with_capacity(attestations.len());
        for attestation in &attestations {
            match attestation {
                TimestampAttestation::TransparencyLog(entry) => {
                    verify_tlog_entry(entry, &self.material.tlogs)?;
                    timestamps.push(VerifiedTimestamp {
                        kind: TimestampKind::TransparencyLog,
                        time: attestation.time()?,
                        log_id: Some(entry.log_id.key_id.as_bytes().to_vec()),
                    });
                }
                TimestampAttestation::TimestampAuthority(token) => {
                    verify_rfc3161_timestamp(
                        token,
                        content.signature(),
                        &self.material.timestamp_authorities,
                    )?;
                    timestamps.push(VerifiedTimestamp {
                        kind: TimestampKind::TimestampAuthority,
                        time: token.time(),
                        log_id: None,
                    });
                }
            }
        }

        // (5)
        let tlog_entries = &bundle.verification_material.tlog_entries;
        for entry in tlog_entries {
            verify_tlog_body(entry, &content)?;
        }

        // (6)
        self.check_thresholds(&key, tlog_entries.len(), &timestamps, scts.len())?;

        // (7)
        if !content.verify_signature(&verification_key) {
            return Err(Error::Signature(
                "signature does not verify with the trusted key".to_string(),
            ));
        }

        tracing::debug!(
            "bundle verified with {} log entries and {} timestamps",
            tlog_entries.len(),
            timestamps.len()
        );

        Ok(SignedEntity {
            signature: content,
            key,
            tlog_entries: tlog_entries.clone(),
            timestamps,
            signer,
            scts,
        })
    }

    fn check_thresholds(
        &self,
        key: &Key,
        tlog_count: usize,
        timestamps: &[VerifiedTimestamp],
        sct_count: usize,
    ) -> Result<()> {
        let options = &self.options;

        if tlog_count < options.tlog_threshold {
            return Err(Error::MissingInclusion(format!(
                "expected at least {} transparency log entries, found {}",
                options.tlog_threshold, tlog_count
            )));
        }

        let tsa_count = timestamps
            .iter()
            .filter(|t| t.kind == TimestampKind::TimestampAuthority)
            .count();
        if tsa_count < options.tsa_threshold {
            return Err(Error::timestamp(format!(
                "expected at least {} RFC 3161 timestamps, found {}",
                options.tsa_threshold, tsa_count
            )));
        }

        // Signing certificates are short-lived, so only they need time evidence
        if let Key::Certificate(_) = key {
            if sct_count < options.ctlog_threshold {
                return Err(Error::certificate(format!(
                    "expected at least {} verified SCTs, found {}",
                    options.ctlog_threshold, sct_count
                )));
            }
            if timestamps.len() < options.timestamp_threshold {
                return Err(Error::timestamp(format!(
                    "expected at least {} verified timestamps, found {}",
                    options.timestamp_threshold,
                    timestamps.len()
                )));
            }
        }

        Ok(())
    }
}

fn collect_attestations(bundle: &Bundle) -> Result<Vec<TimestampAttestation<'_>>> {
    let material = &bundle.verification_material;
    let mut attestations: Vec<TimestampAttestation<'_>> = material
        .tlog_entries
        .iter()
        .map(TimestampAttestation::TransparencyLog)
        .collect();

    for token in material.timestamp_tokens() {
        let token = ParsedTimestamp::from_der(token.as_bytes())
            .map_err(|e| Error::Timestamp {
                message: "invalid RFC 3161 timestamp".to_string(),
                cause: Some(Box::new(Error::timestamp(e.to_string()))),
            })?;
        attestations.push(TimestampAttestation::TimestampAuthority(token));
    }

    Ok(attestations)
}

/// Verify a bundle with default options
pub fn verify(
    bundle: &Bundle,
    artifact: Option<&[u8]>,
    material: &TrustMaterial,
) -> Result<SignedEntity> {
    Verifier::new(material.clone(), VerifierOptions::default()).verify(bundle, artifact)
}
