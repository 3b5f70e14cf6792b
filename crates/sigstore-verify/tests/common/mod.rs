//! Test PKI, transparency log and timestamp authority fixtures
//!
//! Everything is generated at test time from fixed p256 keys so tests are
//! deterministic and need no fixture files.

#![allow(dead_code)]

use base64::Engine;
use chrono::{DateTime, Utc};
use cms::cert::IssuerAndSerialNumber;
use cms::content_info::{CmsVersion, ContentInfo};
use cms::signed_data::{
    EncapsulatedContentInfo, SignedData, SignerIdentifier, SignerInfo, SignerInfos,
};
use const_oid::db::rfc5280::{ID_CE_EXT_KEY_USAGE, ID_CE_SUBJECT_ALT_NAME, ID_KP_TIME_STAMPING};
use const_oid::db::rfc5912::{ECDSA_WITH_SHA_256, ID_SHA_256};
use const_oid::db::rfc6268::{ID_CONTENT_TYPE, ID_MESSAGE_DIGEST};
use const_oid::db::rfc6962::CT_PRECERT_SCTS;
use const_oid::{AssociatedOid, ObjectIdentifier};
use der::asn1::{BitString, GeneralizedTime, Ia5String, Int, OctetString, SetOfVec, Utf8StringRef};
use der::{Any, Encode, Tag};
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{DerSignature, SigningKey};
use p256::pkcs8::EncodePublicKey;
use serde_json::json;
use sigstore_crypto::{Certificate, VerificationKey, OIDC_ISSUER_V2_OID};
use sigstore_trust_root::{KeyMap, TrustMaterial, TrustedPublicKey, TrustedRoot, ValidityWindow};
use sigstore_tsa::asn1::{OID_SIGNED_DATA, OID_TST_INFO};
use sigstore_tsa::{MessageImprint, TstInfo};
use sigstore_types::{
    Bundle, CanonicalizedBody, CertificateContent, CheckpointData, DerCertificate, DsseEnvelope,
    DsseSignature, HashAlgorithm, InclusionPromise, InclusionProof, KindVersion, LogId, LogIndex,
    LogKeyId, MediaType, MessageSignature, PayloadBytes, Rfc3161Timestamp, Sha256Hash,
    SignatureBytes, SignatureContent, SignedTimestamp, TimestampToken, TimestampVerificationData,
    TransparencyLogEntry, VerificationMaterial, VerificationMaterialContent,
};
use std::str::FromStr;
use std::time::Duration;
use x509_cert::attr::Attribute;
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{ExtendedKeyUsage, SubjectAltName};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::{Time, Validity};
use x509_cert::TbsCertificate;

/// Time the test artifacts were signed
pub const SIGNING_TIME: i64 = 1_700_000_000;
pub const CA_NOT_BEFORE: i64 = 1_600_000_000;
pub const CA_NOT_AFTER: i64 = 1_900_000_000;
pub const SIGNER_EMAIL: &str = "signer@example.com";
pub const OIDC_ISSUER: &str = "https://issuer.example";

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub fn key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

pub fn sign(key: &SigningKey, data: &[u8]) -> Vec<u8> {
    let sig: DerSignature = key.sign(data);
    sig.as_bytes().to_vec()
}

pub fn spki_der(key: &SigningKey) -> Vec<u8> {
    key.verifying_key()
        .to_public_key_der()
        .unwrap()
        .as_bytes()
        .to_vec()
}

/// Log IDs are the SHA-256 of the log's public key
pub fn log_id(key: &SigningKey) -> Vec<u8> {
    sigstore_crypto::sha256(&spki_der(key)).as_slice().to_vec()
}

pub fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn wrap(cert: &x509_cert::Certificate) -> Certificate {
    Certificate::from_der(&cert.to_der().unwrap()).unwrap()
}

fn validity(not_before: i64, not_after: i64) -> Validity {
    Validity {
        not_before: GeneralizedTime::from_unix_duration(Duration::from_secs(not_before as u64)).map(Time::from).unwrap(),
        not_after: GeneralizedTime::from_unix_duration(Duration::from_secs(not_after as u64)).map(Time::from).unwrap(),
    }
}

/// Adapter to add a prebuilt extension through the builder
struct RawExtension(Extension);

impl AssociatedOid for RawExtension {
    // overridden by to_extension
    const OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.8");
}

impl x509_cert::ext::AsExtension for RawExtension {
    fn critical(&self, _: &Name, _: &[Extension]) -> bool {
        self.0.critical
    }

    fn to_extension(&self, _: &Name, _: &[Extension]) -> der::Result<Extension> {
        Ok(self.0.clone())
    }
}

impl Encode for RawExtension {
    fn encoded_len(&self) -> der::Result<der::Length> {
        self.0.extn_value.encoded_len()
    }

    fn encode(&self, writer: &mut impl der::Writer) -> der::Result<()> {
        self.0.extn_value.encode(writer)
    }
}

pub fn extension(oid: ObjectIdentifier, critical: bool, value: &impl Encode) -> Extension {
    Extension {
        extn_id: oid,
        critical,
        extn_value: OctetString::new(value.to_der().unwrap()).unwrap(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn issue(
    profile: Profile,
    serial: u8,
    not_before: i64,
    not_after: i64,
    subject: &str,
    key: &SigningKey,
    issuer_key: &SigningKey,
    extensions: Vec<Extension>,
) -> x509_cert::Certificate {
    let mut builder = CertificateBuilder::new(
        profile,
        SerialNumber::new(&[serial]).unwrap(),
        validity(not_before, not_after),
        Name::from_str(subject).unwrap(),
        SubjectPublicKeyInfoOwned::from_key(*key.verifying_key()).unwrap(),
        issuer_key,
    )
    .unwrap();
    for ext in extensions {
        builder.add_extension(&RawExtension(ext)).unwrap();
    }
    builder.build::<DerSignature>().unwrap()
}

pub fn root_ca(key: &SigningKey, serial: u8, subject: &str) -> x509_cert::Certificate {
    issue(
        Profile::Root,
        serial,
        CA_NOT_BEFORE,
        CA_NOT_AFTER,
        subject,
        key,
        key,
        Vec::new(),
    )
}

pub fn sub_ca(
    issuer: &x509_cert::Certificate,
    issuer_key: &SigningKey,
    key: &SigningKey,
    serial: u8,
    subject: &str,
    path_len_constraint: Option<u8>,
) -> x509_cert::Certificate {
    issue(
        Profile::SubCA {
            issuer: issuer.tbs_certificate.subject.clone(),
            path_len_constraint,
        },
        serial,
        CA_NOT_BEFORE,
        CA_NOT_AFTER,
        subject,
        key,
        issuer_key,
        Vec::new(),
    )
}

/// A short-lived signing certificate carrying the signer's identity
pub fn signing_cert(
    issuer: &x509_cert::Certificate,
    issuer_key: &SigningKey,
    key: &SigningKey,
    not_before: i64,
    not_after: i64,
) -> x509_cert::Certificate {
    let san = SubjectAltName(vec![GeneralName::Rfc822Name(
        Ia5String::new(SIGNER_EMAIL).unwrap(),
    )]);
    let oidc_issuer = Utf8StringRef::new(OIDC_ISSUER).unwrap();
    issue(
        Profile::Leaf {
            issuer: issuer.tbs_certificate.subject.clone(),
            enable_key_agreement: false,
            enable_key_encipherment: false,
        },
        10,
        not_before,
        not_after,
        "O=sigstore.dev",
        key,
        issuer_key,
        vec![
            extension(ID_CE_SUBJECT_ALT_NAME, true, &san),
            extension(OIDC_ISSUER_V2_OID, false, &oidc_issuer),
        ],
    )
}

pub fn tsa_cert(
    issuer: &x509_cert::Certificate,
    issuer_key: &SigningKey,
    key: &SigningKey,
) -> x509_cert::Certificate {
    let eku = ExtendedKeyUsage(vec![ID_KP_TIME_STAMPING]);
    issue(
        Profile::Leaf {
            issuer: issuer.tbs_certificate.subject.clone(),
            enable_key_agreement: false,
            enable_key_encipherment: false,
        },
        20,
        CA_NOT_BEFORE,
        CA_NOT_AFTER,
        "CN=Test TSA,O=example",
        key,
        issuer_key,
        vec![extension(ID_CE_EXT_KEY_USAGE, true, &eku)],
    )
}

fn resign(
    tbs: TbsCertificate,
    algorithm: AlgorithmIdentifierOwned,
    issuer_key: &SigningKey,
) -> x509_cert::Certificate {
    let signature = sign(issuer_key, &tbs.to_der().unwrap());
    x509_cert::Certificate {
        tbs_certificate: tbs,
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&signature).unwrap(),
    }
}

/// Add an RFC 6962 SCT list extension with one SCT from `ctlog_key` and
/// re-sign the certificate.
pub fn embed_sct(
    leaf: &x509_cert::Certificate,
    issuer: &x509_cert::Certificate,
    issuer_key: &SigningKey,
    ctlog_key: &SigningKey,
    timestamp_ms: u64,
) -> x509_cert::Certificate {
    let precert_tbs = leaf.tbs_certificate.to_der().unwrap();
    let issuer_spki = issuer
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .unwrap();

    // digitally-signed struct: version, signature type, timestamp,
    // precert entry, extensions
    let mut signed = vec![0u8, 0u8];
    signed.extend_from_slice(&timestamp_ms.to_be_bytes());
    signed.extend_from_slice(&1u16.to_be_bytes());
    signed.extend_from_slice(sigstore_crypto::sha256(&issuer_spki).as_slice());
    signed.extend_from_slice(&(precert_tbs.len() as u32).to_be_bytes()[1..]);
    signed.extend_from_slice(&precert_tbs);
    signed.extend_from_slice(&0u16.to_be_bytes());
    let signature = sign(ctlog_key, &signed);

    let mut sct = vec![0u8];
    sct.extend_from_slice(&log_id(ctlog_key));
    sct.extend_from_slice(&timestamp_ms.to_be_bytes());
    sct.extend_from_slice(&0u16.to_be_bytes());
    // sha256, ecdsa
    sct.extend_from_slice(&[4, 3]);
    sct.extend_from_slice(&(signature.len() as u16).to_be_bytes());
    sct.extend_from_slice(&signature);

    let mut list = ((sct.len() + 2) as u16).to_be_bytes().to_vec();
    list.extend_from_slice(&(sct.len() as u16).to_be_bytes());
    list.extend_from_slice(&sct);

    let mut tbs = leaf.tbs_certificate.clone();
    tbs.extensions.get_or_insert_with(Vec::new).push(extension(
        CT_PRECERT_SCTS,
        false,
        &OctetString::new(list).unwrap(),
    ));
    resign(tbs, leaf.signature_algorithm.clone(), issuer_key)
}

fn valid_for(start: Option<i64>, end: Option<i64>) -> serde_json::Value {
    let mut period = serde_json::Map::new();
    if let Some(start) = start {
        period.insert("start".into(), json!(at(start).to_rfc3339()));
    }
    if let Some(end) = end {
        period.insert("end".into(), json!(at(end).to_rfc3339()));
    }
    serde_json::Value::Object(period)
}

/// Builds a trusted root document
#[derive(Default)]
pub struct RootBuilder {
    cas: Vec<serde_json::Value>,
    tsas: Vec<serde_json::Value>,
    tlogs: Vec<serde_json::Value>,
    ctlogs: Vec<serde_json::Value>,
}

impl RootBuilder {
    fn authority(chain: &[&x509_cert::Certificate], window: (Option<i64>, Option<i64>)) -> serde_json::Value {
        let certificates: Vec<_> = chain
            .iter()
            .map(|c| json!({"rawBytes": b64(&c.to_der().unwrap())}))
            .collect();
        json!({
            "subject": {"organization": "example", "commonName": "test"},
            "uri": "https://ca.example",
            "certChain": {"certificates": certificates},
            "validFor": valid_for(window.0, window.1)
        })
    }

    fn log(key: &SigningKey, id: &[u8], window: (Option<i64>, Option<i64>)) -> serde_json::Value {
        json!({
            "baseUrl": "https://log.example",
            "hashAlgorithm": "SHA2_256",
            "publicKey": {
                "rawBytes": b64(&spki_der(key)),
                "keyDetails": "PKIX_ECDSA_P256_SHA_256",
                "validFor": valid_for(window.0, window.1)
            },
            "logId": {"keyId": b64(id)}
        })
    }

    pub fn ca(
        mut self,
        chain: &[&x509_cert::Certificate],
        start: Option<i64>,
        end: Option<i64>,
    ) -> Self {
        self.cas.push(Self::authority(chain, (start, end)));
        self
    }

    pub fn tsa(
        mut self,
        chain: &[&x509_cert::Certificate],
        start: Option<i64>,
        end: Option<i64>,
    ) -> Self {
        self.tsas.push(Self::authority(chain, (start, end)));
        self
    }

    pub fn tlog(mut self, key: &SigningKey, start: Option<i64>, end: Option<i64>) -> Self {
        self.tlogs.push(Self::log(key, &log_id(key), (start, end)));
        self
    }

    pub fn ctlog(mut self, key: &SigningKey, start: Option<i64>, end: Option<i64>) -> Self {
        self.ctlogs.push(Self::log(key, &log_id(key), (start, end)));
        self
    }

    pub fn ctlog_with_id(mut self, key: &SigningKey, id: &[u8]) -> Self {
        self.ctlogs.push(Self::log(key, id, (None, None)));
        self
    }

    pub fn build(self) -> TrustedRoot {
        let doc = json!({
            "mediaType": "application/vnd.dev.sigstore.trustedroot+json;version=0.1",
            "tlogs": self.tlogs,
            "certificateAuthorities": self.cas,
            "ctlogs": self.ctlogs,
            "timestampAuthorities": self.tsas
        });
        TrustedRoot::from_json(&doc.to_string()).unwrap()
    }
}

/// A transparency log that signs entry timestamps and checkpoints
pub struct TestLog {
    pub key: SigningKey,
    pub origin: String,
}

impl TestLog {
    pub fn new(key: SigningKey) -> Self {
        Self {
            key,
            origin: "log.example - 1234".to_string(),
        }
    }

    pub fn log_id(&self) -> Vec<u8> {
        log_id(&self.key)
    }

    pub fn key_hint(&self) -> [u8; 4] {
        let id = self.log_id();
        [id[0], id[1], id[2], id[3]]
    }

    /// Signed entry timestamp over the canonical entry payload
    pub fn signed_entry_timestamp(&self, body: &[u8], integrated_time: i64, log_index: u64) -> Vec<u8> {
        let payload = json!({
            "body": b64(body),
            "integratedTime": integrated_time,
            "logIndex": log_index,
            "logID": hex::encode(self.log_id()),
        });
        sign(&self.key, &serde_json_canonicalizer::to_vec(&payload).unwrap())
    }

    /// A signed note committing to `root`, signed by `key` under `hint`
    pub fn checkpoint_signed_by(
        &self,
        key: &SigningKey,
        hint: [u8; 4],
        tree_size: u64,
        root: &[u8],
    ) -> String {
        let note = format!("{}\n{}\n{}\n", self.origin, tree_size, b64(root));
        let mut signature = hint.to_vec();
        signature.extend_from_slice(&sign(key, note.as_bytes()));
        format!("{}\n\u{2014} log.example {}\n", note, b64(&signature))
    }

    pub fn checkpoint(&self, tree_size: u64, root: &[u8]) -> String {
        self.checkpoint_signed_by(&self.key, self.key_hint(), tree_size, root)
    }

    /// Inclusion proof for `body` as the first leaf of a two-leaf tree
    pub fn inclusion_proof(&self, body: &[u8]) -> InclusionProof {
        let leaf = sigstore_merkle::hash_leaf(body);
        let sibling = sigstore_merkle::hash_leaf(b"another entry");
        let root = sigstore_merkle::hash_children(&leaf, &sibling);
        InclusionProof {
            log_index: LogIndex::new(0),
            root_hash: root,
            tree_size: 2,
            hashes: vec![sibling],
            checkpoint: CheckpointData {
                envelope: self.checkpoint(2, root.as_slice()),
            },
        }
    }

    /// An entry with both an inclusion promise and an inclusion proof
    pub fn entry(
        &self,
        kind: &str,
        version: &str,
        body: Vec<u8>,
        integrated_time: i64,
    ) -> TransparencyLogEntry {
        let log_index = 42;
        TransparencyLogEntry {
            log_index: LogIndex::new(log_index),
            log_id: LogId {
                key_id: LogKeyId::new(self.log_id()),
            },
            kind_version: KindVersion {
                kind: kind.to_string(),
                version: version.to_string(),
            },
            integrated_time,
            inclusion_promise: Some(InclusionPromise {
                signed_entry_timestamp: SignedTimestamp::new(self.signed_entry_timestamp(
                    &body,
                    integrated_time,
                    log_index,
                )),
            }),
            inclusion_proof: Some(self.inclusion_proof(&body)),
            canonicalized_body: CanonicalizedBody::new(body),
        }
    }
}

pub fn hashedrekord_body(digest: &[u8], signature: &[u8]) -> Vec<u8> {
    serde_json_canonicalizer::to_vec(&json!({
        "apiVersion": "0.0.1",
        "kind": "hashedrekord",
        "spec": {
            "data": {"hash": {"algorithm": "sha256", "value": hex::encode(digest)}},
            "signature": {"content": b64(signature), "publicKey": {"content": ""}}
        }
    }))
    .unwrap()
}

pub fn dsse_body(payload: &[u8], signature: &[u8]) -> Vec<u8> {
    serde_json_canonicalizer::to_vec(&json!({
        "apiVersion": "0.0.1",
        "kind": "dsse",
        "spec": {
            "payloadHash": {
                "algorithm": "sha256",
                "value": sigstore_crypto::sha256(payload).to_hex()
            },
            "signatures": [{"signature": b64(signature), "verifier": ""}]
        }
    }))
    .unwrap()
}

/// RFC 3161 token over `data` issued by `tsa_leaf` at `time`
pub fn timestamp_token(
    tsa_leaf: &x509_cert::Certificate,
    tsa_key: &SigningKey,
    data: &[u8],
    time: i64,
) -> Vec<u8> {
    let sha256 = || AlgorithmIdentifierOwned {
        oid: ID_SHA_256,
        parameters: None,
    };

    let tst_info = TstInfo {
        version: 1,
        policy: ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.2"),
        message_imprint: MessageImprint::new(
            HashAlgorithm::Sha2256,
            sigstore_crypto::sha256(data).as_slice(),
        )
        .unwrap(),
        serial_number: Int::new(&[1]).unwrap(),
        gen_time: GeneralizedTime::from_unix_duration(Duration::from_secs(time as u64)).unwrap(),
        accuracy: None,
        ordering: false,
        nonce: None,
        tsa: None,
        extensions: None,
    };
    let tst_der = tst_info.to_der().unwrap();

    let message_digest = OctetString::new(sigstore_crypto::sha256(&tst_der).as_slice()).unwrap();
    let signed_attrs = SetOfVec::try_from(vec![
        Attribute {
            oid: ID_CONTENT_TYPE,
            values: SetOfVec::try_from(vec![Any::encode_from(&OID_TST_INFO).unwrap()]).unwrap(),
        },
        Attribute {
            oid: ID_MESSAGE_DIGEST,
            values: SetOfVec::try_from(vec![Any::encode_from(&message_digest).unwrap()]).unwrap(),
        },
    ])
    .unwrap();
    let signature = sign(tsa_key, &signed_attrs.to_der().unwrap());

    let signer_info = SignerInfo {
        version: CmsVersion::V1,
        sid: SignerIdentifier::IssuerAndSerialNumber(IssuerAndSerialNumber {
            issuer: tsa_leaf.tbs_certificate.issuer.clone(),
            serial_number: tsa_leaf.tbs_certificate.serial_number.clone(),
        }),
        digest_alg: sha256(),
        signed_attrs: Some(signed_attrs),
        signature_algorithm: AlgorithmIdentifierOwned {
            oid: ECDSA_WITH_SHA_256,
            parameters: None,
        },
        signature: OctetString::new(signature).unwrap(),
        unsigned_attrs: None,
    };

    let signed_data = SignedData {
        version: CmsVersion::V3,
        digest_algorithms: SetOfVec::try_from(vec![sha256()]).unwrap(),
        encap_content_info: EncapsulatedContentInfo {
            econtent_type: OID_TST_INFO,
            econtent: Some(Any::new(Tag::OctetString, tst_der).unwrap()),
        },
        certificates: None,
        crls: None,
        signer_infos: SignerInfos(SetOfVec::try_from(vec![signer_info]).unwrap()),
    };

    ContentInfo {
        content_type: OID_SIGNED_DATA,
        content: Any::encode_from(&signed_data).unwrap(),
    }
    .to_der()
    .unwrap()
}

pub fn dsse_envelope(payload: &[u8], key: &SigningKey) -> DsseEnvelope {
    let payload_type = "application/vnd.in-toto+json";
    let signature = sign(key, &sigstore_types::pae(payload_type, payload));
    DsseEnvelope {
        payload_type: payload_type.to_string(),
        payload: PayloadBytes::new(payload.to_vec()),
        signatures: vec![DsseSignature {
            keyid: String::new(),
            sig: SignatureBytes::new(signature),
        }],
    }
}

pub fn message_signature(signature: Vec<u8>) -> SignatureContent {
    SignatureContent::MessageSignature(MessageSignature {
        message_digest: None,
        signature: SignatureBytes::new(signature),
    })
}

pub fn certificate_material(cert: &x509_cert::Certificate) -> VerificationMaterialContent {
    VerificationMaterialContent::Certificate(CertificateContent {
        raw_bytes: DerCertificate::new(cert.to_der().unwrap()),
    })
}

pub fn bundle(
    content: SignatureContent,
    material: VerificationMaterialContent,
    tlog_entries: Vec<TransparencyLogEntry>,
    tokens: Vec<Vec<u8>>,
) -> Bundle {
    Bundle {
        media_type: MediaType::Bundle0_3.as_str().to_string(),
        verification_material: VerificationMaterial {
            content: material,
            tlog_entries,
            timestamp_verification_data: TimestampVerificationData {
                rfc3161_timestamps: tokens
                    .into_iter()
                    .map(|t| Rfc3161Timestamp {
                        signed_timestamp: TimestampToken::new(t),
                    })
                    .collect(),
            },
        },
        content,
    }
}

/// A complete signing setup: Fulcio-like CA, CT log, transparency log and TSA
pub struct Fixture {
    pub root_key: SigningKey,
    pub root: x509_cert::Certificate,
    pub intermediate_key: SigningKey,
    pub intermediate: x509_cert::Certificate,
    pub signer_key: SigningKey,
    pub ctlog_key: SigningKey,
    pub tlog: TestLog,
    pub tsa_root_key: SigningKey,
    pub tsa_root: x509_cert::Certificate,
    pub tsa_key: SigningKey,
    pub tsa_leaf: x509_cert::Certificate,
}

impl Fixture {
    pub fn new() -> Self {
        let root_key = key(1);
        let root = root_ca(&root_key, 1, "CN=Test Root,O=example");
        let intermediate_key = key(2);
        let intermediate = sub_ca(
            &root,
            &root_key,
            &intermediate_key,
            2,
            "CN=Test Intermediate,O=example",
            Some(0),
        );
        let tsa_root_key = key(6);
        let tsa_root = root_ca(&tsa_root_key, 3, "CN=Test TSA Root,O=example");
        let tsa_key = key(7);
        let tsa_leaf = tsa_cert(&tsa_root, &tsa_root_key, &tsa_key);

        Self {
            root_key,
            root,
            intermediate_key,
            intermediate,
            signer_key: key(3),
            ctlog_key: key(4),
            tlog: TestLog::new(key(5)),
            tsa_root_key,
            tsa_root,
            tsa_key,
            tsa_leaf,
        }
    }

    /// Signing certificate issued by the intermediate, optionally with an SCT
    pub fn signing_cert(&self, not_before: i64, not_after: i64, with_sct: bool) -> x509_cert::Certificate {
        let cert = signing_cert(
            &self.intermediate,
            &self.intermediate_key,
            &self.signer_key,
            not_before,
            not_after,
        );
        if with_sct {
            embed_sct(
                &cert,
                &self.intermediate,
                &self.intermediate_key,
                &self.ctlog_key,
                (not_before as u64) * 1000,
            )
        } else {
            cert
        }
    }

    /// Signing certificate valid for ten minutes around the signing time
    pub fn default_signing_cert(&self) -> x509_cert::Certificate {
        self.signing_cert(SIGNING_TIME - 300, SIGNING_TIME + 300, true)
    }

    pub fn root_builder(&self) -> RootBuilder {
        RootBuilder::default()
            .ca(&[&self.intermediate, &self.root], Some(CA_NOT_BEFORE), None)
            .tlog(&self.tlog.key, Some(CA_NOT_BEFORE), None)
            .ctlog(&self.ctlog_key, Some(CA_NOT_BEFORE), None)
            .tsa(&[&self.tsa_leaf, &self.tsa_root], Some(CA_NOT_BEFORE), None)
    }

    pub fn trusted_root(&self) -> TrustedRoot {
        self.root_builder().build()
    }

    pub fn material(&self) -> TrustMaterial {
        TrustMaterial::from_root(&self.trusted_root()).unwrap()
    }

    /// Trust material that also knows `key` under `hint`
    pub fn material_with_key(&self, hint: &str, key: &SigningKey, window: ValidityWindow) -> TrustMaterial {
        let trusted = TrustedPublicKey::new(
            VerificationKey::from_spki_der(&spki_der(key)).unwrap(),
            window,
        );
        TrustMaterial::build(&self.trusted_root(), KeyMap::new().with_key(hint, trusted)).unwrap()
    }
}

pub fn sha256(data: &[u8]) -> Sha256Hash {
    sigstore_crypto::sha256(data)
}
