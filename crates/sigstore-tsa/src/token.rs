//! RFC 3161 timestamp token parsing and signature verification
//!
//! A token is a CMS SignedData whose encapsulated content is a TSTInfo.
//! Parsing extracts the TSTInfo and its generation time; verification checks
//! that the TSTInfo commits to the timestamped data and that a given TSA
//! certificate signed it. Building and validating the TSA's own certificate
//! chain is left to the caller.

use crate::asn1::{self, TimeStampResp, TstInfo};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerIdentifier, SignerInfo};
use const_oid::ObjectIdentifier;
use der::asn1::{OctetStringRef, SetOfVec};
use der::{Decode, Encode};
use sigstore_crypto::{Certificate, SigningScheme, VerificationKey};
use sigstore_types::HashAlgorithm;
use x509_cert::attr::{Attribute, Attributes};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

const ID_KP_TIME_STAMPING: ObjectIdentifier = const_oid::db::rfc5280::ID_KP_TIME_STAMPING;
const OID_MESSAGE_DIGEST: ObjectIdentifier = const_oid::db::rfc6268::ID_MESSAGE_DIGEST;

/// A parsed RFC 3161 timestamp token
#[derive(Debug, Clone)]
pub struct ParsedTimestamp {
    signed_data: SignedData,
    tst_info: TstInfo,
    tst_info_der: Vec<u8>,
    time: DateTime<Utc>,
}

impl ParsedTimestamp {
    /// Parse a token given either as a `TimeStampResp` or as a bare
    /// `ContentInfo`.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let content_info = match TimeStampResp::from_der(bytes) {
            Ok(resp) => {
                if !resp.status.is_granted() {
                    return Err(Error::ResponseFailure(resp.status.status));
                }
                let token = resp.time_stamp_token.ok_or_else(|| {
                    Error::Parse("TimeStampResp missing timeStampToken".to_string())
                })?;
                let token_der = token
                    .to_der()
                    .map_err(|e| Error::Parse(format!("failed to re-encode token: {}", e)))?;
                ContentInfo::from_der(&token_der)
                    .map_err(|e| Error::Parse(format!("failed to decode ContentInfo: {}", e)))?
            }
            Err(_) => ContentInfo::from_der(bytes)
                .map_err(|e| Error::Parse(format!("failed to decode TimeStampToken: {}", e)))?,
        };

        if content_info.content_type != asn1::OID_SIGNED_DATA {
            return Err(Error::Parse(
                "ContentInfo content type is not SignedData".to_string(),
            ));
        }

        let signed_data_der = content_info
            .content
            .to_der()
            .map_err(|e| Error::Parse(format!("failed to encode SignedData content: {}", e)))?;
        let signed_data = SignedData::from_der(&signed_data_der)
            .map_err(|e| Error::Parse(format!("failed to decode SignedData: {}", e)))?;

        if signed_data.encap_content_info.econtent_type != asn1::OID_TST_INFO {
            return Err(Error::Parse(
                "encap content type is not TSTInfo".to_string(),
            ));
        }

        // eContent is an OCTET STRING wrapping the TSTInfo DER
        let tst_info_der = signed_data
            .encap_content_info
            .econtent
            .as_ref()
            .ok_or(Error::NoTstInfo)?
            .value()
            .to_vec();
        let tst_info = TstInfo::from_der(&tst_info_der)
            .map_err(|e| Error::Parse(format!("failed to decode TSTInfo: {}", e)))?;

        let since_epoch = tst_info.gen_time.to_unix_duration();
        let time = i64::try_from(since_epoch.as_secs())
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, since_epoch.subsec_nanos()))
            .ok_or_else(|| Error::Parse("invalid genTime in TSTInfo".to_string()))?;

        tracing::debug!("parsed timestamp token with genTime {}", time);

        Ok(Self {
            signed_data,
            tst_info,
            tst_info_der,
            time,
        })
    }

    /// The time asserted by the TSA
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn tst_info(&self) -> &TstInfo {
        &self.tst_info
    }

    fn signer_info(&self) -> Result<&SignerInfo> {
        self.signed_data
            .signer_infos
            .0
            .iter()
            .next()
            .ok_or_else(|| Error::SignatureVerification("no signer info found".to_string()))
    }

    /// Issuer and serial number identifying the signer, when the token uses
    /// that form of signer identifier
    pub fn signer_issuer_and_serial(&self) -> Option<(&Name, &SerialNumber)> {
        match &self.signer_info().ok()?.sid {
            SignerIdentifier::IssuerAndSerialNumber(id) => Some((&id.issuer, &id.serial_number)),
            SignerIdentifier::SubjectKeyIdentifier(_) => None,
        }
    }

    /// Whether `cert` is the certificate the token names as its signer
    pub fn is_signed_by(&self, cert: &Certificate) -> bool {
        let Ok(signer) = self.signer_info() else {
            return false;
        };
        match &signer.sid {
            SignerIdentifier::IssuerAndSerialNumber(id) => {
                cert.serial_number() == &id.serial_number && cert.issuer() == &id.issuer
            }
            SignerIdentifier::SubjectKeyIdentifier(ski) => {
                cert.subject_key_id().as_deref() == Some(ski.0.as_bytes())
            }
        }
    }

    /// Verify that the token timestamps `data` and was signed by `signer`.
    pub fn verify(&self, data: &[u8], signer: &Certificate) -> Result<()> {
        self.verify_message_imprint(data)?;

        if !signer.has_extended_key_usage(&ID_KP_TIME_STAMPING) {
            return Err(Error::InvalidEku);
        }

        let signer_info = self.signer_info()?;
        let digest_alg = asn1::digest_algorithm(&signer_info.digest_alg.oid).ok_or_else(|| {
            Error::SignatureVerification(format!(
                "unsupported digest algorithm {}",
                signer_info.digest_alg.oid
            ))
        })?;

        // Without signed attributes the signature covers the TSTInfo itself
        let signed_bytes = match &signer_info.signed_attrs {
            Some(attrs) => {
                verify_message_digest_attribute(attrs, digest_alg, &self.tst_info_der)?;
                signed_attrs_for_verification(attrs)?
            }
            None => self.tst_info_der.clone(),
        };

        let scheme = SigningScheme::for_digest(digest_alg, signer.spki()).ok_or_else(|| {
            Error::SignatureVerification(format!(
                "unsupported key for digest algorithm {}",
                digest_alg
            ))
        })?;
        let key = VerificationKey::from_spki(signer.spki())
            .map_err(|e| Error::SignatureVerification(e.to_string()))?
            .with_scheme(scheme);

        key.verify(&signed_bytes, signer_info.signature.as_bytes())
            .map_err(|e| Error::SignatureVerification(e.to_string()))
    }

    fn verify_message_imprint(&self, data: &[u8]) -> Result<()> {
        let imprint = &self.tst_info.message_imprint;
        let algorithm = imprint.algorithm().ok_or_else(|| {
            Error::Parse(format!(
                "unsupported hash algorithm: {}",
                imprint.hash_algorithm.oid
            ))
        })?;

        let computed = sigstore_crypto::hash(algorithm, data);
        let expected = imprint.hashed_message.as_bytes();
        if computed != expected {
            return Err(Error::HashMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(computed),
            });
        }
        Ok(())
    }
}

/// The message-digest signed attribute must equal the digest of the TSTInfo
fn verify_message_digest_attribute(
    attrs: &Attributes,
    algorithm: HashAlgorithm,
    tst_info_der: &[u8],
) -> Result<()> {
    let attr = attrs
        .iter()
        .find(|attr| attr.oid == OID_MESSAGE_DIGEST)
        .ok_or_else(|| {
            Error::SignatureVerification("message-digest attribute not found".to_string())
        })?;

    if attr.values.len() != 1 {
        return Err(Error::SignatureVerification(
            "message-digest attribute should have exactly one value".to_string(),
        ));
    }
    let value_der = attr
        .values
        .iter()
        .next()
        .ok_or_else(|| Error::SignatureVerification("empty message-digest".to_string()))?
        .to_der()
        .map_err(|e| Error::SignatureVerification(e.to_string()))?;
    let digest = OctetStringRef::from_der(&value_der)
        .map_err(|e| {
            Error::SignatureVerification(format!("message-digest is not an OCTET STRING: {}", e))
        })?;

    let computed = sigstore_crypto::hash(algorithm, tst_info_der);
    if computed != digest.as_bytes() {
        return Err(Error::HashMismatch {
            expected: hex::encode(digest.as_bytes()),
            actual: hex::encode(computed),
        });
    }
    Ok(())
}

/// Signed attributes appear with an implicit [0] tag in the SignerInfo but
/// the signature covers their encoding as a plain SET OF.
fn signed_attrs_for_verification(attrs: &Attributes) -> Result<Vec<u8>> {
    let attrs: Vec<Attribute> = attrs.iter().cloned().collect();
    let set = SetOfVec::try_from(attrs).map_err(|e| {
        Error::SignatureVerification(format!("failed to rebuild signed attributes: {}", e))
    })?;
    set.to_der().map_err(|e| {
        Error::SignatureVerification(format!("failed to re-encode signed attributes: {}", e))
    })
}
