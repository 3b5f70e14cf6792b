//! The Sigstore bundle document
//!
//! Field names follow the protobuf JSON mapping: camelCase keys, 64-bit
//! integers as strings and bytes as standard base64.

use crate::dsse::DsseEnvelope;
use crate::encoding::{
    string_i64, CanonicalizedBody, DerCertificate, DigestBytes, LogIndex, LogKeyId, Sha256Hash,
    SignatureBytes, SignedTimestamp, TimestampToken,
};
use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Older clients write `null` for empty repeated fields
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Known bundle media types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Bundle0_1,
    Bundle0_2,
    Bundle0_3,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Bundle0_1 => "application/vnd.dev.sigstore.bundle+json;version=0.1",
            MediaType::Bundle0_2 => "application/vnd.dev.sigstore.bundle+json;version=0.2",
            MediaType::Bundle0_3 => "application/vnd.dev.sigstore.bundle.v0.3+json",
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // 0.3 was published under both spellings
        const LEGACY_0_3: &str = "application/vnd.dev.sigstore.bundle+json;version=0.3";
        [MediaType::Bundle0_1, MediaType::Bundle0_2, MediaType::Bundle0_3]
            .into_iter()
            .find(|media_type| media_type.as_str() == s)
            .or((s == LEGACY_0_3).then_some(MediaType::Bundle0_3))
            .ok_or_else(|| Error::InvalidMediaType(s.to_string()))
    }
}

/// A signed artifact together with everything needed to verify it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Cosign v1 bundles omit this; they are read as 0.1
    #[serde(default = "default_media_type")]
    pub media_type: String,
    pub verification_material: VerificationMaterial,
    #[serde(flatten)]
    pub content: SignatureContent,
}

impl Bundle {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn media_type(&self) -> Result<MediaType> {
        self.media_type.parse()
    }
}

fn default_media_type() -> String {
    MediaType::Bundle0_1.as_str().to_string()
}

/// What was signed: raw artifact bytes or a DSSE envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureContent {
    MessageSignature(MessageSignature),
    DsseEnvelope(DsseEnvelope),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSignature {
    /// Digest of the artifact; lets the bundle be verified without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_digest: Option<MessageDigest>,
    pub signature: SignatureBytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDigest {
    pub algorithm: HashAlgorithm,
    pub digest: DigestBytes,
}

/// Signer identity plus the timestamp evidence gathered at signing time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMaterial {
    #[serde(flatten)]
    pub content: VerificationMaterialContent,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub tlog_entries: Vec<TransparencyLogEntry>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub timestamp_verification_data: TimestampVerificationData,
}

impl VerificationMaterial {
    /// DER bodies of the RFC 3161 timestamp tokens, in bundle order
    pub fn timestamp_tokens(&self) -> impl Iterator<Item = &TimestampToken> {
        self.timestamp_verification_data
            .rfc3161_timestamps
            .iter()
            .map(|ts| &ts.signed_timestamp)
    }
}

/// How the signer is identified
///
/// The JSON key selects the variant: `certificate` (0.3 bundles),
/// `x509CertificateChain` (0.1 and 0.2) or `publicKey`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationMaterialContent {
    Certificate(CertificateContent),
    /// Leaf first; anything after the leaf is ignored by verification
    X509CertificateChain { certificates: Vec<CertificateContent> },
    /// Key distributed out of band and looked up by hint
    PublicKey { hint: String },
}

impl VerificationMaterialContent {
    /// The signing certificate, or `None` for key hints and empty chains
    pub fn leaf_certificate(&self) -> Option<&DerCertificate> {
        match self {
            VerificationMaterialContent::Certificate(cert) => Some(&cert.raw_bytes),
            VerificationMaterialContent::X509CertificateChain { certificates } => {
                certificates.first().map(|cert| &cert.raw_bytes)
            }
            VerificationMaterialContent::PublicKey { .. } => None,
        }
    }

    pub fn public_key_hint(&self) -> Option<&str> {
        match self {
            VerificationMaterialContent::PublicKey { hint } => Some(hint.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateContent {
    pub raw_bytes: DerCertificate,
}

/// One entry of a transparency log, as recorded in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyLogEntry {
    pub log_index: LogIndex,
    pub log_id: LogId,
    pub kind_version: KindVersion,
    /// Unix seconds
    #[serde(default, with = "string_i64", skip_serializing_if = "is_zero")]
    pub integrated_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion_promise: Option<InclusionPromise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion_proof: Option<InclusionProof>,
    pub canonicalized_body: CanonicalizedBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogId {
    /// SHA-256 of the log's DER public key
    pub key_id: LogKeyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindVersion {
    pub kind: String,
    pub version: String,
}

/// Signed entry timestamp issued by the log on submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionPromise {
    pub signed_entry_timestamp: SignedTimestamp,
}

/// RFC 6962 audit path from the entry's leaf to a signed tree head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    pub log_index: LogIndex,
    pub root_hash: Sha256Hash,
    #[serde(with = "string_i64")]
    pub tree_size: i64,
    #[serde(default)]
    pub hashes: Vec<Sha256Hash>,
    #[serde(default, skip_serializing_if = "CheckpointData::is_empty")]
    pub checkpoint: CheckpointData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointData {
    /// Signed note text
    #[serde(default)]
    pub envelope: String,
}

impl CheckpointData {
    pub fn is_empty(&self) -> bool {
        self.envelope.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimestampVerificationData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rfc3161_timestamps: Vec<Rfc3161Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfc3161Timestamp {
    /// DER `TimeStampResp` or bare `TimeStampToken`
    pub signed_timestamp: TimestampToken,
}
