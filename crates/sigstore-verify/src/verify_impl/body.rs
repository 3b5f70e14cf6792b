//! Consistency between transparency log entry bodies and bundle content
//!
//! A log entry only vouches for the content it recorded. The canonicalized
//! body is decoded and its digest and signature are compared with the
//! bundle's signature content.

use super::content::SignatureContent;
use crate::error::{Error, Result};
use base64::Engine;
use serde::Deserialize;
use sigstore_types::{HashAlgorithm, TransparencyLogEntry};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryBody {
    api_version: String,
    kind: String,
    spec: serde_json::Value,
}

#[derive(Deserialize)]
struct HashValue {
    algorithm: String,
    value: String,
}

#[derive(Deserialize)]
struct HashedRekordV001 {
    data: HashedRekordData,
    signature: HashedRekordSignature,
}

#[derive(Deserialize)]
struct HashedRekordData {
    hash: HashValue,
}

#[derive(Deserialize)]
struct HashedRekordSignature {
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DsseV001 {
    payload_hash: HashValue,
    #[serde(default)]
    signatures: Vec<DsseV001Signature>,
}

#[derive(Deserialize)]
struct DsseV001Signature {
    signature: String,
}

#[derive(Deserialize)]
struct IntotoV002 {
    content: IntotoContent,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntotoContent {
    envelope: IntotoEnvelope,
    payload_hash: HashValue,
}

#[derive(Deserialize)]
struct IntotoEnvelope {
    #[serde(default)]
    signatures: Vec<IntotoSignature>,
}

#[derive(Deserialize)]
struct IntotoSignature {
    sig: String,
}

/// Check that the entry's recorded body matches the signature content
pub fn verify_tlog_body(entry: &TransparencyLogEntry, content: &SignatureContent) -> Result<()> {
    let body: EntryBody = serde_json::from_slice(entry.canonicalized_body.as_bytes())
        .map_err(|e| Error::TlogBody(format!("invalid entry body: {}", e)))?;

    let kind_version = &entry.kind_version;
    if body.kind != kind_version.kind || body.api_version != kind_version.version {
        return Err(Error::TlogBody(format!(
            "kind/version mismatch: entry declares {}/{}, body is {}/{}",
            kind_version.kind, kind_version.version, body.kind, body.api_version
        )));
    }

    match (body.kind.as_str(), body.api_version.as_str(), content) {
        ("hashedrekord", "0.0.1", SignatureContent::MessageSignature { .. }) => {
            let spec: HashedRekordV001 = parse_spec(body.spec)?;
            check_digest(content, &spec.data.hash)?;
            let signature = decode_base64(&spec.signature.content)?;
            if !content.compare_signature(&signature) {
                return Err(Error::TlogBody("signature does not match".to_string()));
            }
            Ok(())
        }
        ("dsse", "0.0.1", SignatureContent::Dsse { .. }) => {
            let spec: DsseV001 = parse_spec(body.spec)?;
            check_digest(content, &spec.payload_hash)?;
            let found = spec
                .signatures
                .iter()
                .filter_map(|s| decode_base64(&s.signature).ok())
                .any(|sig| content.compare_signature(&sig));
            if !found {
                return Err(Error::TlogBody(
                    "envelope signature is not recorded in the entry".to_string(),
                ));
            }
            Ok(())
        }
        ("intoto", "0.0.2", SignatureContent::Dsse { .. }) => {
            let spec: IntotoV002 = parse_spec(body.spec)?;
            check_digest(content, &spec.content.payload_hash)?;
            // Signatures in intoto entries are base64 encoded twice
            let found = spec
                .content
                .envelope
                .signatures
                .iter()
                .filter_map(|s| decode_base64(&s.sig).ok())
                .filter_map(|inner| String::from_utf8(inner).ok())
                .filter_map(|inner| decode_base64(&inner).ok())
                .any(|sig| content.compare_signature(&sig));
            if !found {
                return Err(Error::TlogBody(
                    "envelope signature is not recorded in the entry".to_string(),
                ));
            }
            Ok(())
        }
        (kind, version, _) => Err(Error::TlogBody(format!(
            "unsupported entry {}/{} for this bundle content",
            kind, version
        ))),
    }
}

fn parse_spec<T: for<'de> Deserialize<'de>>(spec: serde_json::Value) -> Result<T> {
    serde_json::from_value(spec).map_err(|e| Error::TlogBody(format!("invalid entry spec: {}", e)))
}

fn decode_base64(value: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| Error::TlogBody(format!("invalid base64: {}", e)))
}

fn check_digest(content: &SignatureContent, hash: &HashValue) -> Result<()> {
    let algorithm = HashAlgorithm::from_log_name(&hash.algorithm).ok_or_else(|| {
        Error::TlogBody(format!("unsupported digest algorithm {:?}", hash.algorithm))
    })?;
    let digest =
        hex::decode(&hash.value).map_err(|e| Error::TlogBody(format!("invalid digest: {}", e)))?;
    if digest.len() != algorithm.digest_size() {
        return Err(Error::TlogBody(format!(
            "{} digest has {} bytes",
            algorithm.log_name(),
            digest.len()
        )));
    }
    if !content.compare_digest(&digest) {
        return Err(Error::TlogBody("digest does not match".to_string()));
    }
    Ok(())
}
