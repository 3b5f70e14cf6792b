//! Signature verification using aws-lc-rs

use crate::error::{Error, Result};
use crate::scheme::SigningScheme;
use aws_lc_rs::signature::{
    UnparsedPublicKey, VerificationAlgorithm, ECDSA_P256_SHA256_ASN1, ECDSA_P256_SHA384_ASN1,
    ECDSA_P384_SHA256_ASN1, ECDSA_P384_SHA384_ASN1, ED25519, RSA_PKCS1_2048_8192_SHA256,
    RSA_PKCS1_2048_8192_SHA384, RSA_PKCS1_2048_8192_SHA512, RSA_PSS_2048_8192_SHA256,
    RSA_PSS_2048_8192_SHA384, RSA_PSS_2048_8192_SHA512,
};
use der::Decode;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

/// A public key for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    /// Raw public key bytes (the SPKI `subjectPublicKey` bit string contents)
    pub bytes: Vec<u8>,
    /// The scheme to use for verification
    pub scheme: SigningScheme,
}

impl VerificationKey {
    /// Create a new verification key
    pub fn new(bytes: Vec<u8>, scheme: SigningScheme) -> Self {
        Self { bytes, scheme }
    }

    /// Build a key from a DER-encoded SubjectPublicKeyInfo.
    ///
    /// The scheme defaults to the one implied by the key algorithm. Keys
    /// whose algorithm is not supported are rejected.
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoOwned::from_der(der)?;
        Self::from_spki(&spki)
    }

    /// Build a key from a parsed SubjectPublicKeyInfo
    pub fn from_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let scheme = SigningScheme::for_public_key(spki)?;
        let bytes = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| Error::InvalidKeyFormat("public key has unused bits".to_string()))?
            .to_vec();
        Ok(Self { bytes, scheme })
    }

    /// Replace the verification scheme
    pub fn with_scheme(mut self, scheme: SigningScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Verify a signature over data
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        verify_signature(&self.bytes, data, signature, self.scheme)
    }
}

fn algorithm(scheme: SigningScheme) -> &'static dyn VerificationAlgorithm {
    match scheme {
        SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1,
        SigningScheme::EcdsaP256Sha384 => &ECDSA_P256_SHA384_ASN1,
        SigningScheme::EcdsaP384Sha256 => &ECDSA_P384_SHA256_ASN1,
        SigningScheme::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1,
        SigningScheme::Ed25519 => &ED25519,
        SigningScheme::RsaPssSha256 => &RSA_PSS_2048_8192_SHA256,
        SigningScheme::RsaPssSha384 => &RSA_PSS_2048_8192_SHA384,
        SigningScheme::RsaPssSha512 => &RSA_PSS_2048_8192_SHA512,
        SigningScheme::RsaPkcs1Sha256 => &RSA_PKCS1_2048_8192_SHA256,
        SigningScheme::RsaPkcs1Sha384 => &RSA_PKCS1_2048_8192_SHA384,
        SigningScheme::RsaPkcs1Sha512 => &RSA_PKCS1_2048_8192_SHA512,
    }
}

/// Verify `signature` over `data` with raw public key bytes (the SPKI bit string)
pub fn verify_signature(
    public_key: &[u8],
    data: &[u8],
    signature: &[u8],
    scheme: SigningScheme,
) -> Result<()> {
    UnparsedPublicKey::new(algorithm(scheme), public_key)
        .verify(data, signature)
        .map_err(|_| Error::Verification(format!("{} signature invalid", scheme.name())))
}
