//! RFC 3161 structures read during verification
//!
//! Request-side types are absent; tokens only ever arrive inside bundles.

use const_oid::db::rfc5912::{ID_SHA_256, ID_SHA_384, ID_SHA_512};
use const_oid::ObjectIdentifier;
use der::{
    asn1::{BitString, GeneralizedTime, Int, OctetString},
    Sequence,
};
use sigstore_types::HashAlgorithm;
use x509_cert::ext::{pkix::name::GeneralName, Extensions};
use x509_cert::spki::AlgorithmIdentifierOwned;

/// id-ct-TSTInfo
pub const OID_TST_INFO: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.16.1.4");

/// id-signedData
pub const OID_SIGNED_DATA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

pub fn digest_oid(algorithm: HashAlgorithm) -> ObjectIdentifier {
    match algorithm {
        HashAlgorithm::Sha2256 => ID_SHA_256,
        HashAlgorithm::Sha2384 => ID_SHA_384,
        HashAlgorithm::Sha2512 => ID_SHA_512,
    }
}

/// Inverse of [`digest_oid`]; `None` for digests a token may not use
pub fn digest_algorithm(oid: &ObjectIdentifier) -> Option<HashAlgorithm> {
    [
        HashAlgorithm::Sha2256,
        HashAlgorithm::Sha2384,
        HashAlgorithm::Sha2512,
    ]
    .into_iter()
    .find(|alg| digest_oid(*alg) == *oid)
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct MessageImprint {
    pub hash_algorithm: AlgorithmIdentifierOwned,
    pub hashed_message: OctetString,
}

impl MessageImprint {
    pub fn new(algorithm: HashAlgorithm, digest: &[u8]) -> der::Result<Self> {
        Ok(Self {
            hash_algorithm: AlgorithmIdentifierOwned {
                oid: digest_oid(algorithm),
                parameters: None,
            },
            hashed_message: OctetString::new(digest)?,
        })
    }

    pub fn algorithm(&self) -> Option<HashAlgorithm> {
        digest_algorithm(&self.hash_algorithm.oid)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct PkiStatusInfo {
    pub status: u8,
    #[asn1(optional = "true")]
    pub fail_info: Option<BitString>,
}

impl PkiStatusInfo {
    /// `granted` (0) or `grantedWithMods` (1)
    pub fn is_granted(&self) -> bool {
        self.status <= 1
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct Accuracy {
    #[asn1(optional = "true")]
    pub seconds: Option<u64>,
    #[asn1(context_specific = "0", optional = "true")]
    pub millis: Option<u16>,
    #[asn1(context_specific = "1", optional = "true")]
    pub micros: Option<u16>,
}

fn not_ordered() -> bool {
    false
}

/// The content signed by the timestamp authority
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct TstInfo {
    pub version: u8,
    pub policy: ObjectIdentifier,
    pub message_imprint: MessageImprint,
    pub serial_number: Int,
    pub gen_time: GeneralizedTime,
    #[asn1(optional = "true")]
    pub accuracy: Option<Accuracy>,
    #[asn1(default = "not_ordered")]
    pub ordering: bool,
    #[asn1(optional = "true")]
    pub nonce: Option<Int>,
    #[asn1(context_specific = "0", optional = "true", tag_mode = "EXPLICIT")]
    pub tsa: Option<GeneralName>,
    #[asn1(context_specific = "1", optional = "true", tag_mode = "IMPLICIT")]
    pub extensions: Option<Extensions>,
}

/// `TimeStampResp`; the token is a CMS `ContentInfo`
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct TimeStampResp {
    pub status: PkiStatusInfo,
    #[asn1(optional = "true")]
    pub time_stamp_token: Option<der::Any>,
}
