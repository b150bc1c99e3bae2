use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::IntegrityError;

/// Prefix of named-image reference keys (`machOHash:<module>`)
pub const IMAGE_HASH_PREFIX: &str = "machOHash";

/// Identifier of an expected measurement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReferenceKey {
    /// Expected application identity (`bundleId`)
    BundleId,
    /// Expected digest of the provisioning artifact (`provisionHash`)
    ProvisionHash,
    /// Expected digest of a named loaded module (`machOHash:<module>`)
    ImageHash(String),
    /// Expected digest of the main executable (`mainBinaryHash`)
    MainImageHash,
}

impl ReferenceKey {
    /// Module name for image keys
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        match self {
            Self::ImageHash(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BundleId => write!(f, "bundleId"),
            Self::ProvisionHash => write!(f, "provisionHash"),
            Self::ImageHash(name) => write!(f, "{IMAGE_HASH_PREFIX}:{name}"),
            Self::MainImageHash => write!(f, "mainBinaryHash"),
        }
    }
}

impl FromStr for ReferenceKey {
    type Err = IntegrityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bundleId" => Ok(Self::BundleId),
            "provisionHash" => Ok(Self::ProvisionHash),
            "mainBinaryHash" => Ok(Self::MainImageHash),
            other => match other.split_once(':') {
                Some((IMAGE_HASH_PREFIX, name)) if !name.trim().is_empty() => {
                    Ok(Self::ImageHash(name.trim().to_string()))
                }
                _ => Err(IntegrityError::InvalidKey(other.to_string())),
            },
        }
    }
}

impl TryFrom<String> for ReferenceKey {
    type Error = IntegrityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReferenceKey> for String {
    fn from(key: ReferenceKey) -> Self {
        key.to_string()
    }
}

/// A named expected measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceValue {
    /// What is being checked
    pub key: ReferenceKey,

    /// Hex digest or identity string, compared verbatim
    pub value: String,
}

impl ReferenceValue {
    /// Create a new reference value
    #[must_use]
    pub fn new(key: ReferenceKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}
