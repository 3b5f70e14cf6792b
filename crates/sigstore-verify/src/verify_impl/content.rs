//! Signature content derived from a bundle

use crate::error::{Error, Result};
use sigstore_crypto::VerificationKey;
use sigstore_types::{DsseEnvelope, SignatureContent as BundleContent};

/// What was signed, and the signature over it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureContent {
    /// A DSSE envelope; the digest is the SHA-256 of its payload and the
    /// signature is the envelope's first signature over the PAE
    Dsse {
        envelope: DsseEnvelope,
        signature: Vec<u8>,
        digest: Vec<u8>,
    },
    /// A signature directly over the artifact bytes
    MessageSignature {
        signature: Vec<u8>,
        digest: Vec<u8>,
        artifact: Vec<u8>,
    },
}

impl SignatureContent {
    /// Derive the signature content from a bundle's content and the artifact.
    ///
    /// A message signature needs the artifact; when the bundle also declares
    /// a digest, it must be the digest of that artifact.
    pub fn from_bundle(content: &BundleContent, artifact: Option<&[u8]>) -> Result<Self> {
        match content {
            BundleContent::DsseEnvelope(envelope) => {
                let signature = envelope
                    .primary_signature()
                    .ok_or_else(|| Error::Bundle("DSSE envelope has no signatures".to_string()))?;
                Ok(SignatureContent::Dsse {
                    digest: sigstore_crypto::sha256(envelope.payload.as_bytes())
                        .as_slice()
                        .to_vec(),
                    signature: signature.as_bytes().to_vec(),
                    envelope: envelope.clone(),
                })
            }
            BundleContent::MessageSignature(message) => {
                let artifact = artifact.ok_or_else(|| {
                    Error::Bundle("message signature bundles require the artifact".to_string())
                })?;

                let digest = match &message.message_digest {
                    Some(declared) => {
                        let computed = sigstore_crypto::hash(declared.algorithm, artifact);
                        if computed != declared.digest.as_bytes() {
                            return Err(Error::Signature(format!(
                                "artifact {} digest does not match the bundle",
                                declared.algorithm
                            )));
                        }
                        computed
                    }
                    None => sigstore_crypto::sha256(artifact).as_slice().to_vec(),
                };

                Ok(SignatureContent::MessageSignature {
                    signature: message.signature.as_bytes().to_vec(),
                    digest,
                    artifact: artifact.to_vec(),
                })
            }
        }
    }

    pub fn signature(&self) -> &[u8] {
        match self {
            SignatureContent::Dsse { signature, .. }
            | SignatureContent::MessageSignature { signature, .. } => signature,
        }
    }

    pub fn digest(&self) -> &[u8] {
        match self {
            SignatureContent::Dsse { digest, .. }
            | SignatureContent::MessageSignature { digest, .. } => digest,
        }
    }

    pub fn compare_digest(&self, digest: &[u8]) -> bool {
        self.digest() == digest
    }

    pub fn compare_signature(&self, signature: &[u8]) -> bool {
        self.signature() == signature
    }

    /// Check the signature with `key`: over the PAE for DSSE, over the raw
    /// artifact for message signatures
    pub fn verify_signature(&self, key: &VerificationKey) -> bool {
        let result = match self {
            SignatureContent::Dsse {
                envelope,
                signature,
                ..
            } => key.verify(&envelope.pae(), signature),
            SignatureContent::MessageSignature {
                signature,
                artifact,
                ..
            } => key.verify(artifact, signature),
        };
        if let Err(e) = &result {
            tracing::debug!("content signature rejected: {}", e);
        }
        result.is_ok()
    }
}
