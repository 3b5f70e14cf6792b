//! Type-safe encoding wrappers
//!
//! Bundle JSON carries binary data as base64 strings and integers as decimal
//! strings. The newtypes here decode once at deserialization time so the rest
//! of the workspace handles raw bytes, while still serializing back to the
//! same JSON shape.

use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declare a newtype over `Vec<u8>` that (de)serializes as standard base64.
macro_rules! base64_bytes_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Wrap raw bytes
            pub fn new(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }

            /// Decode from a base64 string
            pub fn from_base64(s: &str) -> Result<Self> {
                Ok(Self(decode_base64(s)?))
            }

            /// Encode as a base64 string
            pub fn to_base64(&self) -> String {
                base64::engine::general_purpose::STANDARD.encode(&self.0)
            }

            /// Get the raw bytes
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Consume and return the raw bytes
            pub fn into_bytes(self) -> Vec<u8> {
                self.0
            }

            /// Length in bytes
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Whether there are no bytes
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                Self(bytes.to_vec())
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_base64())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                decode_base64(&s).map(Self).map_err(serde::de::Error::custom)
            }
        }
    };
}

fn decode_base64(s: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(s)
        .map_err(|e| Error::InvalidEncoding(format!("invalid base64: {}", e)))
}

base64_bytes_type!(
    /// A DER-encoded X.509 certificate
    DerCertificate
);

base64_bytes_type!(
    /// A DER-encoded SubjectPublicKeyInfo
    DerPublicKey
);

base64_bytes_type!(
    /// Raw signature bytes
    SignatureBytes
);

base64_bytes_type!(
    /// A message digest of any length
    DigestBytes
);

base64_bytes_type!(
    /// A DSSE payload
    PayloadBytes
);

base64_bytes_type!(
    /// The canonicalized body of a transparency log entry
    CanonicalizedBody
);

base64_bytes_type!(
    /// A Signed Entry Timestamp (inclusion promise signature)
    SignedTimestamp
);

base64_bytes_type!(
    /// A DER-encoded RFC 3161 timestamp token
    TimestampToken
);

base64_bytes_type!(
    /// A transparency log identifier (SHA-256 of the log's public key)
    LogKeyId
);

impl LogKeyId {
    /// The 4-byte key hint used by signed notes
    pub fn key_hint(&self) -> Option<[u8; 4]> {
        self.0.get(..4).and_then(|b| b.try_into().ok())
    }
}

/// Hex-encoded data
///
/// This type represents data that is hex-encoded (lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hex(String);

impl Hex {
    /// Create a Hex wrapper from raw bytes
    pub fn encode(bytes: &[u8]) -> Self {
        Hex(hex::encode(bytes))
    }

    /// Decode the hex string to bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        hex::decode(&self.0).map_err(|e| Error::InvalidEncoding(format!("invalid hex: {}", e)))
    }

    /// Get the underlying string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Hex {
    fn from(s: String) -> Self {
        Hex(s)
    }
}

/// SHA-256 hash digest (32 bytes)
///
/// Serialized as base64 in bundle JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash([u8; 32]);

impl Sha256Hash {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Sha256Hash(bytes)
    }

    /// Try to create from a byte slice
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            Error::InvalidEncoding(format!("SHA-256 hash must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Sha256Hash(arr))
    }

    /// Parse from hex-encoded string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| Error::InvalidEncoding(format!("invalid hex: {}", e)))?;
        Self::try_from_slice(&bytes)
    }

    /// Parse from base64-encoded string
    pub fn from_base64(s: &str) -> Result<Self> {
        Self::try_from_slice(&decode_base64(s)?)
    }

    /// Encode as hex string (lowercase)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encode as base64 string
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Get as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Sha256Hash(bytes)
    }
}

impl Serialize for Sha256Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Sha256Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Sha256Hash::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

/// Position of an entry in a transparency log
///
/// Serialized as a decimal string, as protobuf JSON does for int64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LogIndex(u64);

impl LogIndex {
    /// Create a new log index
    pub fn new(index: u64) -> Self {
        LogIndex(index)
    }

    /// Get the index as a u64
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for LogIndex {
    fn from(index: u64) -> Self {
        LogIndex(index)
    }
}

impl Serialize for LogIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for LogIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        string_or_number::deserialize(deserializer).and_then(|v: i64| {
            u64::try_from(v)
                .map(LogIndex)
                .map_err(|_| serde::de::Error::custom("log index must not be negative"))
        })
    }
}

/// Accepts an int64 written either as a JSON string or a JSON number.
mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s.parse().map_err(serde::de::Error::custom),
            StringOrNumber::Number(n) => Ok(n),
        }
    }
}

/// Serde helper for i64 values carried as decimal strings
pub mod string_i64 {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::string_or_number::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash_hex = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let hash = Sha256Hash::from_hex(hash_hex).unwrap();
        assert_eq!(hash.to_hex(), hash_hex);
    }

    #[test]
    fn test_sha256_wrong_length() {
        assert!(Sha256Hash::try_from_slice(&[0u8; 31]).is_err());
        assert!(Sha256Hash::from_hex("abcd").is_err());
    }

    #[test]
    fn test_base64_newtype_json() {
        let sig: SignatureBytes = serde_json::from_str("\"aGVsbG8=\"").unwrap();
        assert_eq!(sig.as_bytes(), b"hello");
        assert_eq!(serde_json::to_string(&sig).unwrap(), "\"aGVsbG8=\"");
    }

    #[test]
    fn test_base64_newtype_rejects_garbage() {
        let result: std::result::Result<DerCertificate, _> = serde_json::from_str("\"not base64!\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_log_index_accepts_string_and_number() {
        let a: LogIndex = serde_json::from_str("\"25579\"").unwrap();
        let b: LogIndex = serde_json::from_str("25579").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"25579\"");
        assert!(serde_json::from_str::<LogIndex>("\"-1\"").is_err());
    }

    #[test]
    fn test_key_hint() {
        let id = LogKeyId::new(vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(id.key_hint(), Some([1, 2, 3, 4]));
        assert_eq!(LogKeyId::new(vec![1, 2]).key_hint(), None);
    }
}
