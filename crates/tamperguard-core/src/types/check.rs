use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BinaryImageRef, ReferenceKey};

/// One kind of integrity check
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum CheckKind {
    /// Application identity reported by the host platform
    BundleIdentity,
    /// Digest of the embedded provisioning artifact
    ProvisionFile,
    /// Digest of a named loaded module
    NamedImage(String),
    /// Digest of the running main executable
    MainImage,
}

impl CheckKind {
    /// Reference key holding the expected value for this check
    #[must_use]
    pub fn reference_key(&self) -> ReferenceKey {
        match self {
            Self::BundleIdentity => ReferenceKey::BundleId,
            Self::ProvisionFile => ReferenceKey::ProvisionHash,
            Self::NamedImage(name) => ReferenceKey::ImageHash(name.clone()),
            Self::MainImage => ReferenceKey::MainImageHash,
        }
    }

    /// Image to hash, for image checks
    #[must_use]
    pub fn image(&self) -> Option<BinaryImageRef> {
        match self {
            Self::NamedImage(name) => Some(BinaryImageRef::Named(name.clone())),
            Self::MainImage => Some(BinaryImageRef::Main),
            Self::BundleIdentity | Self::ProvisionFile => None,
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BundleIdentity => write!(f, "BundleIdentity"),
            Self::ProvisionFile => write!(f, "ProvisionFile"),
            Self::NamedImage(name) => write!(f, "NamedImage({name})"),
            Self::MainImage => write!(f, "MainImage"),
        }
    }
}

/// Outcome of a single comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Which check ran
    pub kind: CheckKind,

    /// Reference value
    pub expected: String,

    /// Measured value
    pub actual: String,

    /// Exact string equality of expected and actual
    pub matched: bool,
}

impl CheckResult {
    /// Compare expected and actual byte-for-byte
    #[must_use]
    pub fn compare(kind: CheckKind, expected: String, actual: String) -> Self {
        let matched = expected == actual;
        Self {
            kind,
            expected,
            actual,
            matched,
        }
    }
}

/// Result of evaluating a set of checks
///
/// `overall` is the AND of every per-check result; there is no partial pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    checks: Vec<CheckResult>,
    overall: bool,
}

impl Verdict {
    /// Build a verdict from per-check results
    #[must_use]
    pub fn new(checks: Vec<CheckResult>) -> Self {
        let overall = checks.iter().all(|c| c.matched);
        Self { checks, overall }
    }

    /// Per-check results, in request order
    #[must_use]
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// True only if every check matched
    #[must_use]
    pub const fn overall(&self) -> bool {
        self.overall
    }

    /// True if any check mismatched
    #[must_use]
    pub const fn is_tampered(&self) -> bool {
        !self.overall
    }

    /// Checks that did not match
    pub fn mismatches(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_is_case_sensitive() {
        let r = CheckResult::compare(CheckKind::MainImage, "AB".into(), "ab".into());
        assert!(!r.matched);
        let r = CheckResult::compare(CheckKind::MainImage, "ab".into(), "ab".into());
        assert!(r.matched);
    }

    #[test]
    fn comparison_does_not_trim() {
        let r = CheckResult::compare(CheckKind::BundleIdentity, "com.x ".into(), "com.x".into());
        assert!(!r.matched);
    }

    #[test]
    fn verdict_is_and_of_checks() {
        let ok = CheckResult::compare(CheckKind::BundleIdentity, "a".into(), "a".into());
        let bad = CheckResult::compare(CheckKind::ProvisionFile, "a".into(), "b".into());

        let verdict = Verdict::new(vec![ok.clone()]);
        assert!(verdict.overall());

        let verdict = Verdict::new(vec![ok, bad]);
        assert!(verdict.is_tampered());
        assert_eq!(verdict.mismatches().count(), 1);
        assert_eq!(verdict.mismatches().next().unwrap().kind, CheckKind::ProvisionFile);
    }

    #[test]
    fn check_kind_keys() {
        assert_eq!(CheckKind::BundleIdentity.reference_key(), ReferenceKey::BundleId);
        assert_eq!(CheckKind::ProvisionFile.reference_key(), ReferenceKey::ProvisionHash);
        assert_eq!(CheckKind::MainImage.reference_key(), ReferenceKey::MainImageHash);
        assert_eq!(CheckKind::MainImage.image(), Some(BinaryImageRef::Main));
        assert_eq!(CheckKind::BundleIdentity.image(), None);
    }
}
