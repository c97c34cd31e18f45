//! Fixed-width fingerprints of witnessed data.
//!
//! A fingerprint is the SHA-256 digest of the record bytes. Engines only ever
//! store fingerprints, never the records themselves.

use crate::error::{Result, WitnessError};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Width of a fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// SHA-256 digest of a witnessed record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Hash `data` into a fingerprint. Never fails, empty input included.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Wrap an already computed digest without hashing it again.
    pub const fn from_digest(digest: [u8; FINGERPRINT_LEN]) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; FINGERPRINT_LEN]> for Fingerprint {
    fn from(digest: [u8; FINGERPRINT_LEN]) -> Self {
        Self::from_digest(digest)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = WitnessError;

    fn from_str(s: &str) -> Result<Self> {
        let mut digest = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(s.trim(), &mut digest).map_err(|e| {
            WitnessError::InvalidConfig(format!("Invalid fingerprint '{s}': {e}"))
        })?;
        Ok(Self(digest))
    }
}
