//! The `TrustedRoot` document
//!
//! This is the JSON form distributed through TUF. Parsing only checks the
//! shape of the document; certificates, keys and times are decoded when
//! [`TrustMaterial`](crate::TrustMaterial) is built from it.

use crate::window::ValidityWindow;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sigstore_types::{CertificateContent, DerPublicKey, HashAlgorithm, LogId};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedRoot {
    pub media_type: String,
    /// Rekor instances
    #[serde(default)]
    pub tlogs: Vec<TransparencyLogInstance>,
    /// Fulcio instances
    #[serde(default)]
    pub certificate_authorities: Vec<CertificateAuthority>,
    #[serde(default)]
    pub ctlogs: Vec<TransparencyLogInstance>,
    #[serde(default)]
    pub timestamp_authorities: Vec<CertificateAuthority>,
}

impl TrustedRoot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A transparency log (Rekor) or certificate transparency log
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyLogInstance {
    #[serde(default)]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<HashAlgorithm>,
    pub public_key: PublicKey,
    pub log_id: LogId,
}

/// A certificate or timestamp authority and the chain it signs with
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateAuthority {
    #[serde(default)]
    pub uri: String,
    pub cert_chain: X509CertificateChain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<TimeRange>,
}

/// Issuing certificates, closest to the leaf first
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct X509CertificateChain {
    pub certificates: Vec<CertificateContent>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKey {
    /// DER SubjectPublicKeyInfo
    pub raw_bytes: DerPublicKey,
    /// Protobuf `PublicKeyDetails` name, e.g. `PKIX_ECDSA_P256_SHA_256`
    #[serde(default)]
    pub key_details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<TimeRange>,
}

/// RFC 3339 bounds, kept as text until trust material is built
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimeRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl TimeRange {
    pub fn to_window(&self) -> Result<ValidityWindow> {
        Ok(ValidityWindow::new(
            self.start.as_deref().map(parse_rfc3339).transpose()?,
            self.end.as_deref().map(parse_rfc3339).transpose()?,
        ))
    }
}

/// A missing range is valid forever
pub(crate) fn window_of(range: Option<&TimeRange>) -> Result<ValidityWindow> {
    range.map_or(Ok(ValidityWindow::unbounded()), TimeRange::to_window)
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| Error::TimeParse {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
