//! Load fingerprints.
//!
//! A [`Fingerprint`] is a SHA-256 digest over the template parameters and
//! every `(key, value)` pair bound during a load, in processing order. Two
//! loads with equal fingerprints resolved the same keys to the same values.

use std::fmt::{self, Display, Formatter};

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hex-encoded digest of one load.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The digest as lowercase hex.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incrementally builds a [`Fingerprint`].
#[derive(Clone, Debug)]
pub struct FingerprintBuilder {
    hasher: Sha256,
}

impl FingerprintBuilder {
    /// Starts a fingerprint seeded with the template parameters.
    #[must_use]
    pub fn new(params: Option<&Value>) -> Self {
        let mut builder = Self {
            hasher: Sha256::new(),
        };

        match params {
            Some(params) => builder.field(params.to_string().as_bytes()),
            None => builder.field(b""),
        }

        builder
    }

    /// Adds one bound key and its value.
    pub fn update(&mut self, key: &str, value: &str) {
        self.field(key.as_bytes());
        self.field(value.as_bytes());
    }

    // Length-prefixed so ("ab", "c") and ("a", "bc") differ.
    fn field(&mut self, bytes: &[u8]) {
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
    }

    /// Finishes the digest.
    #[must_use]
    pub fn finish(self) -> Fingerprint {
        Fingerprint(format!("{:x}", self.hasher.finalize()))
    }
}
