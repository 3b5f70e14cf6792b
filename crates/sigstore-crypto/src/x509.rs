//! Immutable X.509 certificate wrapper
//!
//! A [`Certificate`] is parsed once from DER and shared cheaply between
//! verifications. Operations that would change the certificate, such as
//! stripping an extension before re-deriving an RFC 6962 precertificate,
//! return a new value and leave the original untouched.

use crate::error::{Error, Result};
use crate::scheme::SigningScheme;
use crate::verification::VerificationKey;
use chrono::{DateTime, Utc};
use const_oid::db::rfc5280::ID_CE_EXT_KEY_USAGE;
use const_oid::ObjectIdentifier;
use der::asn1::AnyRef;
use der::{Decode, Encode, SliceReader};
use std::sync::Arc;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

/// OIDC issuer extension written by Fulcio (legacy, raw string value)
pub const OIDC_ISSUER_V1_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.1");

/// OIDC issuer extension written by Fulcio (DER UTF8String value)
pub const OIDC_ISSUER_V2_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.8");

/// An immutable, parsed X.509 certificate
#[derive(Clone)]
pub struct Certificate {
    inner: Arc<Inner>,
}

struct Inner {
    cert: x509_cert::Certificate,
    der: Vec<u8>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl Certificate {
    /// Parse a DER-encoded certificate
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let cert = x509_cert::Certificate::from_der(der)
            .map_err(|e| Error::InvalidCertificate(format!("failed to parse certificate: {}", e)))?;

        let validity = &cert.tbs_certificate.validity;
        let not_before = to_datetime(validity.not_before.to_unix_duration().as_secs())?;
        let not_after = to_datetime(validity.not_after.to_unix_duration().as_secs())?;

        Ok(Self {
            inner: Arc::new(Inner {
                cert,
                der: der.to_vec(),
                not_before,
                not_after,
            }),
        })
    }

    /// The DER encoding this certificate was parsed from
    pub fn der(&self) -> &[u8] {
        &self.inner.der
    }

    /// The underlying parsed certificate
    pub fn x509(&self) -> &x509_cert::Certificate {
        &self.inner.cert
    }

    pub fn subject(&self) -> &Name {
        &self.inner.cert.tbs_certificate.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.cert.tbs_certificate.issuer
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.inner.cert.tbs_certificate.serial_number
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.inner.not_before
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.inner.not_after
    }

    /// Whether `time` lies inside the closed validity interval
    pub fn valid_at(&self, time: DateTime<Utc>) -> bool {
        self.inner.not_before <= time && time <= self.inner.not_after
    }

    /// Whether the basic constraints extension marks this as a CA
    pub fn is_ca(&self) -> bool {
        matches!(self.basic_constraints(), Some(bc) if bc.ca)
    }

    /// Path length constraint from the basic constraints extension
    pub fn path_len_constraint(&self) -> Option<u8> {
        self.basic_constraints()
            .filter(|bc| bc.ca)
            .and_then(|bc| bc.path_len_constraint)
    }

    fn basic_constraints(&self) -> Option<BasicConstraints> {
        self.inner
            .cert
            .tbs_certificate
            .get::<BasicConstraints>()
            .ok()
            .flatten()
            .map(|(_, bc)| bc)
    }

    pub fn subject_key_id(&self) -> Option<Vec<u8>> {
        self.inner
            .cert
            .tbs_certificate
            .get::<SubjectKeyIdentifier>()
            .ok()
            .flatten()
            .map(|(_, ski)| ski.0.as_bytes().to_vec())
    }

    pub fn authority_key_id(&self) -> Option<Vec<u8>> {
        self.inner
            .cert
            .tbs_certificate
            .get::<AuthorityKeyIdentifier>()
            .ok()
            .flatten()
            .and_then(|(_, aki)| aki.key_identifier)
            .map(|id| id.as_bytes().to_vec())
    }

    /// Look up an extension by OID
    pub fn extension(&self, oid: &ObjectIdentifier) -> Option<&Extension> {
        self.inner
            .cert
            .tbs_certificate
            .extensions
            .as_ref()?
            .iter()
            .find(|ext| &ext.extn_id == oid)
    }

    pub fn has_extension(&self, oid: &ObjectIdentifier) -> bool {
        self.extension(oid).is_some()
    }

    /// Whether issuer and subject names are equal
    pub fn is_self_issued(&self) -> bool {
        self.subject() == self.issuer()
    }

    /// Self-issued and verifiable with its own public key
    pub fn is_self_signed(&self) -> bool {
        self.is_self_issued() && self.verify_issued_by(self)
    }

    /// Check that `issuer`'s public key verifies this certificate's signature
    pub fn verify_issued_by(&self, issuer: &Certificate) -> bool {
        match self.check_signature(issuer) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("signature check against candidate issuer failed: {}", e);
                false
            }
        }
    }

    fn check_signature(&self, issuer: &Certificate) -> Result<()> {
        let sig_oid = self.inner.cert.signature_algorithm.oid;
        let issuer_spki = issuer.spki();
        let scheme = SigningScheme::for_signature_algorithm(sig_oid, issuer_spki).ok_or_else(
            || Error::UnsupportedAlgorithm(format!("certificate signature algorithm {}", sig_oid)),
        )?;
        let key = VerificationKey::from_spki(issuer_spki)?.with_scheme(scheme);
        let signature = self.inner.cert.signature.as_bytes().ok_or_else(|| {
            Error::InvalidCertificate("signature has unused bits".to_string())
        })?;
        key.verify(&self.raw_tbs()?, signature)
    }

    /// The TBS bytes exactly as they appear in the original encoding
    fn raw_tbs(&self) -> Result<Vec<u8>> {
        let outer = AnyRef::from_der(&self.inner.der)?;
        let mut reader = SliceReader::new(outer.value())?;
        let tbs = AnyRef::decode(&mut reader)?;
        Ok(tbs.to_der()?)
    }

    /// DER re-encoding of the to-be-signed body
    pub fn tbs_der(&self) -> Result<Vec<u8>> {
        Ok(self.inner.cert.tbs_certificate.to_der()?)
    }

    pub fn spki(&self) -> &SubjectPublicKeyInfoOwned {
        &self.inner.cert.tbs_certificate.subject_public_key_info
    }

    /// DER encoding of the SubjectPublicKeyInfo
    pub fn spki_der(&self) -> Result<Vec<u8>> {
        Ok(self.spki().to_der()?)
    }

    /// Public key usable for verification, with the key's default scheme
    pub fn public_key(&self) -> Result<VerificationKey> {
        VerificationKey::from_spki(self.spki())
    }

    /// Copy of this certificate with every extension of the given OID removed.
    ///
    /// The copy's signature no longer covers its body; it is only meant for
    /// re-deriving signed structures such as RFC 6962 precertificates.
    pub fn without_extension(&self, oid: &ObjectIdentifier) -> Result<Certificate> {
        let mut cert = self.inner.cert.clone();
        if let Some(exts) = cert.tbs_certificate.extensions.as_mut() {
            exts.retain(|ext| &ext.extn_id != oid);
        }
        let der = cert.to_der()?;
        Certificate::from_der(&der)
    }

    /// First email or URI subject alternative name
    pub fn subject_alternative_name(&self) -> Option<String> {
        let (_, san) = self
            .inner
            .cert
            .tbs_certificate
            .get::<SubjectAltName>()
            .ok()
            .flatten()?;

        san.0.iter().find_map(|name| match name {
            GeneralName::Rfc822Name(email) => Some(email.to_string()),
            GeneralName::UniformResourceIdentifier(uri) => Some(uri.to_string()),
            _ => None,
        })
    }

    /// String value of an extension
    ///
    /// Values encoded as a DER UTF8String are decoded, anything else is read
    /// as raw UTF-8.
    pub fn extension_string(&self, oid: &ObjectIdentifier) -> Option<String> {
        let value = self.extension(oid)?.extn_value.as_bytes();
        if let Ok(utf8) = der::asn1::Utf8StringRef::from_der(value) {
            return Some(utf8.to_string());
        }
        std::str::from_utf8(value).ok().map(str::to_string)
    }

    /// OIDC issuer recorded by Fulcio, preferring the newer extension
    pub fn oidc_issuer(&self) -> Option<String> {
        self.extension_string(&OIDC_ISSUER_V2_OID)
            .or_else(|| self.extension_string(&OIDC_ISSUER_V1_OID))
    }

    pub fn has_extended_key_usage(&self, usage: &ObjectIdentifier) -> bool {
        let Some(ext) = self.extension(&ID_CE_EXT_KEY_USAGE) else {
            return false;
        };
        ExtendedKeyUsage::from_der(ext.extn_value.as_bytes())
            .map(|eku| eku.0.contains(usage))
            .unwrap_or(false)
    }
}

fn to_datetime(secs: u64) -> Result<DateTime<Utc>> {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .ok_or_else(|| Error::InvalidCertificate(format!("validity time {} out of range", secs)))
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.inner.der == other.inner.der
    }
}

impl Eq for Certificate {}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject().to_string())
            .field("issuer", &self.issuer().to_string())
            .field("not_before", &self.inner.not_before)
            .field("not_after", &self.inner.not_after)
            .finish()
    }
}
