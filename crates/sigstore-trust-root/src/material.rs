//! Queryable trust material built from a trusted root document

use crate::key::{KeyMap, KeyResolver, TrustedPublicKey};
use crate::trusted_root::{window_of, CertificateAuthority, TransparencyLogInstance, TrustedRoot};
use crate::window::ValidityWindow;
use crate::{Error, Result};
use sigstore_crypto::{Certificate, SigningScheme, VerificationKey};
use std::sync::Arc;

/// A certificate chain trusted within a validity window
#[derive(Debug, Clone, PartialEq)]
pub struct CertAuthority {
    /// Certificates, leaf first
    pub chain: Vec<Certificate>,
    pub window: ValidityWindow,
}

/// A transparency log or CT log instance
#[derive(Debug, Clone, PartialEq)]
pub struct TLogAuthority {
    pub log_id: Vec<u8>,
    pub key: VerificationKey,
    pub window: ValidityWindow,
}

impl TLogAuthority {
    /// Four-byte key hint used in signed note signatures
    pub fn key_hint(&self) -> Option<[u8; 4]> {
        self.log_id.get(..4).and_then(|b| b.try_into().ok())
    }
}

/// Everything a verifier trusts, built once and shared read-only
#[derive(Clone)]
pub struct TrustMaterial {
    pub certificate_authorities: Vec<CertAuthority>,
    pub timestamp_authorities: Vec<CertAuthority>,
    pub tlogs: Vec<TLogAuthority>,
    pub ctlogs: Vec<TLogAuthority>,
    key_resolver: Arc<dyn KeyResolver>,
}

impl TrustMaterial {
    /// Build trust material from a trusted root and a resolver for public
    /// key hints.
    pub fn build(root: &TrustedRoot, resolver: impl KeyResolver + 'static) -> Result<Self> {
        let material = Self {
            certificate_authorities: build_authorities(&root.certificate_authorities)?,
            timestamp_authorities: build_authorities(&root.timestamp_authorities)?,
            tlogs: build_logs(&root.tlogs)?,
            ctlogs: build_logs(&root.ctlogs)?,
            key_resolver: Arc::new(resolver),
        };
        tracing::debug!(
            "built trust material: {} CAs, {} TSAs, {} tlogs, {} ctlogs",
            material.certificate_authorities.len(),
            material.timestamp_authorities.len(),
            material.tlogs.len(),
            material.ctlogs.len()
        );
        Ok(material)
    }

    /// Build trust material with no public key hints
    pub fn from_root(root: &TrustedRoot) -> Result<Self> {
        Self::build(root, KeyMap::new())
    }

    /// Look up the key for a public key hint
    pub fn resolve_key(&self, hint: &str) -> Option<TrustedPublicKey> {
        self.key_resolver.resolve(hint)
    }
}

impl std::fmt::Debug for TrustMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustMaterial")
            .field("certificate_authorities", &self.certificate_authorities.len())
            .field("timestamp_authorities", &self.timestamp_authorities.len())
            .field("tlogs", &self.tlogs.len())
            .field("ctlogs", &self.ctlogs.len())
            .finish_non_exhaustive()
    }
}

fn build_authorities(entries: &[CertificateAuthority]) -> Result<Vec<CertAuthority>> {
    entries
        .iter()
        .map(|ca| {
            let chain = ca
                .cert_chain
                .certificates
                .iter()
                .map(|entry| {
                    Certificate::from_der(entry.raw_bytes.as_bytes()).map_err(|e| {
                        Error::Certificate {
                            authority: ca.uri.clone(),
                            reason: e.to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            if chain.is_empty() {
                return Err(Error::Certificate {
                    authority: ca.uri.clone(),
                    reason: "empty certificate chain".to_string(),
                });
            }
            Ok(CertAuthority {
                chain,
                window: window_of(ca.valid_for.as_ref())?,
            })
        })
        .collect()
}

fn build_logs(entries: &[TransparencyLogInstance]) -> Result<Vec<TLogAuthority>> {
    entries
        .iter()
        .map(|log| {
            let public_key = &log.public_key;
            let mut key = VerificationKey::from_spki_der(public_key.raw_bytes.as_bytes())
                .map_err(|e| Error::InvalidKey {
                    log: log.base_url.clone(),
                    reason: e.to_string(),
                })?;
            if let Some(scheme) = SigningScheme::from_key_details(&public_key.key_details) {
                key = key.with_scheme(scheme);
            }
            Ok(TLogAuthority {
                log_id: log.log_id.key_id.as_bytes().to_vec(),
                key,
                window: window_of(public_key.valid_for.as_ref())?,
            })
        })
        .collect()
}
