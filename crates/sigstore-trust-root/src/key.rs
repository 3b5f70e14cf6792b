//! Caller-supplied public keys, looked up by hint

use crate::window::ValidityWindow;
use chrono::{DateTime, Utc};
use sigstore_crypto::VerificationKey;
use std::collections::HashMap;

/// A public key the caller trusts, along with when it may be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedPublicKey {
    pub key: VerificationKey,
    pub window: ValidityWindow,
}

impl TrustedPublicKey {
    pub fn new(key: VerificationKey, window: ValidityWindow) -> Self {
        Self { key, window }
    }

    /// Whether the key may be used at `time`
    pub fn valid_for(&self, time: DateTime<Utc>) -> bool {
        self.window.contains(time)
    }
}

/// Resolves a bundle's public key hint to a trusted key
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, hint: &str) -> Option<TrustedPublicKey>;
}

impl<F> KeyResolver for F
where
    F: Fn(&str) -> Option<TrustedPublicKey> + Send + Sync,
{
    fn resolve(&self, hint: &str) -> Option<TrustedPublicKey> {
        self(hint)
    }
}

/// Explicit mapping from hint to key
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    keys: HashMap<String, TrustedPublicKey>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, replacing any previous key with the same hint
    pub fn insert(&mut self, hint: impl Into<String>, key: TrustedPublicKey) {
        self.keys.insert(hint.into(), key);
    }

    pub fn with_key(mut self, hint: impl Into<String>, key: TrustedPublicKey) -> Self {
        self.insert(hint, key);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyResolver for KeyMap {
    fn resolve(&self, hint: &str) -> Option<TrustedPublicKey> {
        self.keys.get(hint).cloned()
    }
}
