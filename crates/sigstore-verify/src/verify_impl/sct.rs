//! Certificate Transparency SCT (Signed Certificate Timestamp) verification
//!
//! SCTs embedded in a certificate were signed by the CT log over the
//! precertificate, i.e. the certificate body without the SCT list extension.
//! Verification rebuilds that RFC 6962 `digitally-signed` structure from a
//! stripped copy of the leaf and checks it against the trusted CT logs.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use const_oid::db::rfc6962::CT_PRECERT_SCTS;
use sigstore_crypto::{Certificate, SigningScheme};
use sigstore_trust_root::{filter_tlog_authorities, TLogAuthority, TLogFilter};
use tls_codec::{SerializeBytes, TlsByteVecU16, TlsByteVecU24, TlsSerializeBytes, TlsSize};
use x509_cert::ext::pkix::sct::Version;
use x509_cert::ext::pkix::{SignedCertificateTimestamp, SignedCertificateTimestampList};

// TLS SignatureAndHashAlgorithm constants (RFC 5246, RFC 8446)
const ECDSA_SHA256: u16 = 0x0403;
const ECDSA_SHA384: u16 = 0x0503;
const RSA_PKCS1_SHA256: u16 = 0x0401;
const RSA_PKCS1_SHA384: u16 = 0x0501;
const RSA_PKCS1_SHA512: u16 = 0x0601;
const ED25519: u16 = 0x0807;

/// SignatureType as defined in RFC 6962
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u8)]
enum SignatureType {
    CertificateTimestamp = 0,
}

/// LogEntryType as defined in RFC 6962
#[derive(PartialEq, Debug)]
#[repr(u16)]
enum LogEntryType {
    PrecertEntry = 1,
}

#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct PreCert {
    /// SHA-256 hash of the issuer's SubjectPublicKeyInfo
    issuer_key_hash: [u8; 32],
    /// The TBSCertificate with the SCT extension removed
    tbs_certificate: TlsByteVecU24,
}

#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u16)]
enum SignedEntry {
    #[tls_codec(discriminant = "LogEntryType::PrecertEntry")]
    PrecertEntry(PreCert),
}

/// The structure a CT log signs when issuing an SCT for a precertificate
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct DigitallySigned {
    version: Version,
    signature_type: SignatureType,
    timestamp: u64,
    signed_entry: SignedEntry,
    extensions: TlsByteVecU16,
}

impl DigitallySigned {
    fn for_precert(
        sct: &SignedCertificateTimestamp,
        issuer_key_hash: [u8; 32],
        precert_tbs: &[u8],
    ) -> Self {
        DigitallySigned {
            version: match sct.version {
                Version::V1 => Version::V1,
            },
            signature_type: SignatureType::CertificateTimestamp,
            timestamp: sct.timestamp,
            signed_entry: SignedEntry::PrecertEntry(PreCert {
                issuer_key_hash,
                tbs_certificate: precert_tbs.into(),
            }),
            extensions: sct.extensions.clone(),
        }
    }
}

/// Verify every SCT embedded in `leaf`, returning the IDs of the logs that
/// issued them.
///
/// A leaf without the SCT list extension, or with an empty list, yields an
/// empty result. Each SCT must be verified by at least one CT log whose ID
/// matches and whose validity window contains the SCT time.
pub fn verify_scts(
    leaf: &Certificate,
    issuer: &Certificate,
    ctlogs: &[TLogAuthority],
) -> Result<Vec<Vec<u8>>> {
    let list = match leaf
        .x509()
        .tbs_certificate
        .get::<SignedCertificateTimestampList>()
    {
        Ok(Some((_, list))) => list,
        Ok(None) => return Ok(Vec::new()),
        Err(e) => {
            return Err(Error::certificate(format!(
                "failed to decode SCT list extension: {}",
                e
            )))
        }
    };

    let serialized = list
        .parse_timestamps()
        .map_err(|e| Error::certificate(format!("failed to parse SCT list: {:?}", e)))?;
    if serialized.is_empty() {
        return Ok(Vec::new());
    }

    // The SCT list is not part of what the log signed
    let precert = leaf
        .without_extension(&CT_PRECERT_SCTS)
        .map_err(|e| Error::certificate(format!("failed to strip SCT extension: {}", e)))?;
    let precert_tbs = precert
        .tbs_der()
        .map_err(|e| Error::certificate(format!("failed to encode precert TBS: {}", e)))?;
    let issuer_spki = issuer
        .spki_der()
        .map_err(|e| Error::certificate(format!("failed to encode issuer key: {}", e)))?;
    let issuer_key_hash = *sigstore_crypto::sha256(&issuer_spki).as_bytes();

    let mut log_ids = Vec::with_capacity(serialized.len());
    for entry in serialized {
        let sct = entry
            .parse_timestamp()
            .map_err(|e| Error::certificate(format!("failed to parse SCT: {:?}", e)))?;
        let signed_data = DigitallySigned::for_precert(&sct, issuer_key_hash, &precert_tbs)
            .tls_serialize()
            .map_err(|e| Error::certificate(format!("failed to serialize SCT data: {}", e)))?;
        let sig_alg_bytes = sct.signature.algorithm.tls_serialize().map_err(|e| {
            Error::certificate(format!("failed to serialize signature algorithm: {}", e))
        })?;
        let sig_alg = u16::from_be_bytes([sig_alg_bytes[0], sig_alg_bytes[1]]);
        let signature = sct.signature.signature.as_slice();
        let log_id = sct.log_id.key_id;

        let time = i64::try_from(sct.timestamp)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| Error::certificate("SCT timestamp out of range"))?;
        let logs = filter_tlog_authorities(
            ctlogs,
            TLogFilter {
                log_id: Some(log_id.as_slice()),
                target_date: Some(time),
            },
        );

        let verified = logs.iter().any(|log| {
            let Some(scheme) = sct_scheme(sig_alg, log.key.scheme) else {
                tracing::debug!("unsupported SCT signature algorithm 0x{:04x}", sig_alg);
                return false;
            };
            log.key
                .clone()
                .with_scheme(scheme)
                .verify(&signed_data, signature)
                .is_ok()
        });
        if !verified {
            return Err(Error::certificate(format!(
                "SCT from log {} could not be verified",
                hex::encode(log_id)
            )));
        }

        tracing::debug!("SCT verified for CT log {}", hex::encode(log_id));
        log_ids.push(log_id.to_vec());
    }

    Ok(log_ids)
}

/// Combine the TLS signature algorithm with the curve of the log's key
fn sct_scheme(sig_alg: u16, key_scheme: SigningScheme) -> Option<SigningScheme> {
    let p384 = matches!(
        key_scheme,
        SigningScheme::EcdsaP384Sha256 | SigningScheme::EcdsaP384Sha384
    );
    let scheme = match sig_alg {
        ECDSA_SHA256 if p384 => SigningScheme::EcdsaP384Sha256,
        ECDSA_SHA256 => SigningScheme::EcdsaP256Sha256,
        ECDSA_SHA384 if p384 => SigningScheme::EcdsaP384Sha384,
        ECDSA_SHA384 => SigningScheme::EcdsaP256Sha384,
        RSA_PKCS1_SHA256 => SigningScheme::RsaPkcs1Sha256,
        RSA_PKCS1_SHA384 => SigningScheme::RsaPkcs1Sha384,
        RSA_PKCS1_SHA512 => SigningScheme::RsaPkcs1Sha512,
        ED25519 => SigningScheme::Ed25519,
        _ => return None,
    };
    Some(scheme)
}
