use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a hex-encoded SHA-256 digest
pub const SHA256_HEX_LEN: usize = 64;

/// A loadable code image to hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "target", content = "name")]
pub enum BinaryImageRef {
    /// The running main executable
    Main,
    /// A named loaded module or framework
    Named(String),
}

impl fmt::Display for BinaryImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main executable"),
            Self::Named(name) => write!(f, "module '{name}'"),
        }
    }
}

/// Digest algorithm used for measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, 256-bit output
    #[default]
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Output of a digest computation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashResult {
    /// Algorithm that produced the digest
    pub algorithm: HashAlgorithm,

    /// Lowercase hex digest
    pub digest_hex: String,
}

impl HashResult {
    /// Wrap a lowercase hex SHA-256 digest
    #[must_use]
    pub fn sha256(digest_hex: impl Into<String>) -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            digest_hex: digest_hex.into(),
        }
    }

    /// Returns true if the digest is exactly 64 lowercase hex characters
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.digest_hex.len() == SHA256_HEX_LEN
            && self
                .digest_hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for HashResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest_hex)
    }
}
