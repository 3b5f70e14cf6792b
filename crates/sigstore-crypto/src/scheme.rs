//! Signature schemes understood by the verifier

use crate::error::{Error, Result};
use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384, ID_EC_PUBLIC_KEY, ID_RSASSA_PSS, RSA_ENCRYPTION,
    SECP_256_R_1, SECP_384_R_1, SHA_256_WITH_RSA_ENCRYPTION, SHA_384_WITH_RSA_ENCRYPTION,
    SHA_512_WITH_RSA_ENCRYPTION,
};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;
use sigstore_types::HashAlgorithm;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

/// Signing scheme (key type + digest + padding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256
    EcdsaP256Sha256,
    /// ECDSA P-256 with SHA-384
    EcdsaP256Sha384,
    /// ECDSA P-384 with SHA-256
    EcdsaP384Sha256,
    /// ECDSA P-384 with SHA-384
    EcdsaP384Sha384,
    /// Ed25519
    Ed25519,
    /// RSA PSS with SHA-256
    RsaPssSha256,
    /// RSA PSS with SHA-384
    RsaPssSha384,
    /// RSA PSS with SHA-512
    RsaPssSha512,
    /// RSA PKCS#1 v1.5 with SHA-256
    RsaPkcs1Sha256,
    /// RSA PKCS#1 v1.5 with SHA-384
    RsaPkcs1Sha384,
    /// RSA PKCS#1 v1.5 with SHA-512
    RsaPkcs1Sha512,
}

/// Curve or key family of a SubjectPublicKeyInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyFamily {
    P256,
    P384,
    Ed25519,
    Rsa,
}

impl SigningScheme {
    /// Get the name of this scheme
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP256Sha384 => "ECDSA_P256_SHA384",
            SigningScheme::EcdsaP384Sha256 => "ECDSA_P384_SHA256",
            SigningScheme::EcdsaP384Sha384 => "ECDSA_P384_SHA384",
            SigningScheme::Ed25519 => "ED25519",
            SigningScheme::RsaPssSha256 => "RSA_PSS_SHA256",
            SigningScheme::RsaPssSha384 => "RSA_PSS_SHA384",
            SigningScheme::RsaPssSha512 => "RSA_PSS_SHA512",
            SigningScheme::RsaPkcs1Sha256 => "RSA_PKCS1_SHA256",
            SigningScheme::RsaPkcs1Sha384 => "RSA_PKCS1_SHA384",
            SigningScheme::RsaPkcs1Sha512 => "RSA_PKCS1_SHA512",
        }
    }

    /// Map a trust root `keyDetails` value (protobuf `PublicKeyDetails`) to a scheme.
    ///
    /// Returns `None` for values that do not pin a scheme.
    pub fn from_key_details(details: &str) -> Option<Self> {
        let scheme = match details {
            "PKIX_ECDSA_P256_SHA_256" => SigningScheme::EcdsaP256Sha256,
            "PKIX_ECDSA_P384_SHA_384" => SigningScheme::EcdsaP384Sha384,
            "PKIX_ED25519" => SigningScheme::Ed25519,
            "PKIX_RSA_PKCS1V15_2048_SHA256"
            | "PKIX_RSA_PKCS1V15_3072_SHA256"
            | "PKIX_RSA_PKCS1V15_4096_SHA256"
            | "PKCS1_RSA_PKCS1V5"
            | "PKIX_RSA_PKCS1V5" => SigningScheme::RsaPkcs1Sha256,
            "PKIX_RSA_PSS_2048_SHA256" | "PKIX_RSA_PSS_3072_SHA256"
            | "PKIX_RSA_PSS_4096_SHA256" => SigningScheme::RsaPssSha256,
            _ => return None,
        };
        Some(scheme)
    }

    /// Default scheme for a public key, derived from its SPKI algorithm.
    pub fn for_public_key(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        Ok(match key_family(spki)? {
            KeyFamily::P256 => SigningScheme::EcdsaP256Sha256,
            KeyFamily::P384 => SigningScheme::EcdsaP384Sha384,
            KeyFamily::Ed25519 => SigningScheme::Ed25519,
            KeyFamily::Rsa => SigningScheme::RsaPkcs1Sha256,
        })
    }

    /// Scheme for an X.509 signature algorithm made with the given issuer key.
    ///
    /// Returns `None` when the combination is not supported.
    pub fn for_signature_algorithm(
        signature_oid: ObjectIdentifier,
        issuer_spki: &SubjectPublicKeyInfoOwned,
    ) -> Option<Self> {
        let family = key_family(issuer_spki).ok()?;
        let scheme = match (signature_oid, family) {
            (ECDSA_WITH_SHA_256, KeyFamily::P256) => SigningScheme::EcdsaP256Sha256,
            (ECDSA_WITH_SHA_256, KeyFamily::P384) => SigningScheme::EcdsaP384Sha256,
            (ECDSA_WITH_SHA_384, KeyFamily::P256) => SigningScheme::EcdsaP256Sha384,
            (ECDSA_WITH_SHA_384, KeyFamily::P384) => SigningScheme::EcdsaP384Sha384,
            (ID_ED_25519, KeyFamily::Ed25519) => SigningScheme::Ed25519,
            (SHA_256_WITH_RSA_ENCRYPTION, KeyFamily::Rsa) => SigningScheme::RsaPkcs1Sha256,
            (SHA_384_WITH_RSA_ENCRYPTION, KeyFamily::Rsa) => SigningScheme::RsaPkcs1Sha384,
            (SHA_512_WITH_RSA_ENCRYPTION, KeyFamily::Rsa) => SigningScheme::RsaPkcs1Sha512,
            _ => return None,
        };
        Some(scheme)
    }

    /// Scheme for a signature made with `digest` by the given key, as
    /// declared by CMS signer infos.
    pub fn for_digest(digest: HashAlgorithm, spki: &SubjectPublicKeyInfoOwned) -> Option<Self> {
        let scheme = match (key_family(spki).ok()?, digest) {
            (KeyFamily::P256, HashAlgorithm::Sha2256) => SigningScheme::EcdsaP256Sha256,
            (KeyFamily::P256, HashAlgorithm::Sha2384) => SigningScheme::EcdsaP256Sha384,
            (KeyFamily::P384, HashAlgorithm::Sha2256) => SigningScheme::EcdsaP384Sha256,
            (KeyFamily::P384, HashAlgorithm::Sha2384) => SigningScheme::EcdsaP384Sha384,
            (KeyFamily::Ed25519, _) => SigningScheme::Ed25519,
            (KeyFamily::Rsa, HashAlgorithm::Sha2256) => SigningScheme::RsaPkcs1Sha256,
            (KeyFamily::Rsa, HashAlgorithm::Sha2384) => SigningScheme::RsaPkcs1Sha384,
            (KeyFamily::Rsa, HashAlgorithm::Sha2512) => SigningScheme::RsaPkcs1Sha512,
            _ => return None,
        };
        Some(scheme)
    }
}

impl std::fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn key_family(spki: &SubjectPublicKeyInfoOwned) -> Result<KeyFamily> {
    let alg_oid = spki.algorithm.oid;

    if alg_oid == ID_EC_PUBLIC_KEY {
        let params = spki.algorithm.parameters.as_ref().ok_or_else(|| {
            Error::InvalidKeyFormat("EC key missing curve parameters".to_string())
        })?;
        // params.value() holds the raw OID content bytes
        let curve_oid = ObjectIdentifier::from_bytes(params.value()).map_err(|e| {
            Error::InvalidKeyFormat(format!("failed to parse EC curve OID: {}", e))
        })?;
        match curve_oid {
            SECP_256_R_1 => Ok(KeyFamily::P256),
            SECP_384_R_1 => Ok(KeyFamily::P384),
            other => Err(Error::UnsupportedAlgorithm(format!("EC curve {}", other))),
        }
    } else if alg_oid == RSA_ENCRYPTION || alg_oid == ID_RSASSA_PSS {
        Ok(KeyFamily::Rsa)
    } else if alg_oid == ID_ED_25519 {
        Ok(KeyFamily::Ed25519)
    } else {
        Err(Error::UnsupportedAlgorithm(format!(
            "public key algorithm {}",
            alg_oid
        )))
    }
}
