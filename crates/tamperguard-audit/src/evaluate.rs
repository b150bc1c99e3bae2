//! Tamper evaluation: compare fresh measurements with reference values.
//!
//! ```text
//! checks + snapshot
//!   -> expected values (all present, or InsufficientReferenceData)
//!   -> actual values (hashed concurrently; any failure aborts)
//!   -> exact comparison per check
//!   -> Verdict { overall = AND(matched) }
//! ```

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tamperguard_core::{
    BinaryImageRef, CheckKind, CheckResult, IntegrityError, Result, Verdict, VerdictReport,
};
use tracing::{debug, info, warn};

use crate::bundle::{AppBundle, PROVISIONING_PROFILE_NAME};
use crate::hash::BinaryHasher;
use crate::store::{ReferenceSnapshot, ReferenceStore};

/// Named check sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckPreset {
    /// Bundle identity, provisioning artifact, named module
    #[default]
    Tamper,
    /// Named module and main executable
    App,
    /// Every check kind
    All,
}

impl CheckPreset {
    /// Expand into concrete checks for `module`
    #[must_use]
    pub fn checks(self, module: &str) -> Vec<CheckKind> {
        let image = CheckKind::NamedImage(module.to_string());
        match self {
            Self::Tamper => vec![CheckKind::BundleIdentity, CheckKind::ProvisionFile, image],
            Self::App => vec![image, CheckKind::MainImage],
            Self::All => vec![
                CheckKind::BundleIdentity,
                CheckKind::ProvisionFile,
                image,
                CheckKind::MainImage,
            ],
        }
    }
}

impl FromStr for CheckPreset {
    type Err = IntegrityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tamper" => Ok(Self::Tamper),
            "app" => Ok(Self::App),
            "all" => Ok(Self::All),
            other => Err(IntegrityError::Config(format!(
                "unknown check preset '{other}' (expected tamper, app or all)"
            ))),
        }
    }
}

impl fmt::Display for CheckPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tamper => write!(f, "tamper"),
            Self::App => write!(f, "app"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Produces verdicts from measurements and a reference snapshot.
///
/// Holds no state between calls.
#[derive(Clone)]
pub struct TamperEvaluator {
    hasher: BinaryHasher,
    bundle: Arc<dyn AppBundle>,
}

impl TamperEvaluator {
    pub fn new(hasher: BinaryHasher, bundle: impl AppBundle + 'static) -> Self {
        Self {
            hasher,
            bundle: Arc::new(bundle),
        }
    }

    /// Hasher used for image and file measurements
    #[must_use]
    pub const fn hasher(&self) -> &BinaryHasher {
        &self.hasher
    }

    /// Host bundle introspection
    #[must_use]
    pub fn bundle(&self) -> &dyn AppBundle {
        self.bundle.as_ref()
    }

    /// Evaluate `checks` against one reference snapshot.
    ///
    /// Fails with `InsufficientReferenceData` if any requested check has no
    /// reference value, and with the measurement error if any actual value
    /// cannot be obtained. Neither is ever reported as a mismatch.
    pub async fn evaluate(
        &self,
        checks: &[CheckKind],
        snapshot: &ReferenceSnapshot,
    ) -> Result<Verdict> {
        if checks.is_empty() {
            return Err(IntegrityError::NoChecksRequested);
        }

        let expected = resolve_expected(checks, snapshot)?;
        debug!(checks = checks.len(), "reference values resolved");

        let actual = try_join_all(checks.iter().map(|check| self.measure(check))).await?;

        let results: Vec<CheckResult> = checks
            .iter()
            .cloned()
            .zip(expected)
            .zip(actual)
            .map(|((kind, expected), actual)| CheckResult::compare(kind, expected, actual))
            .collect();

        for mismatch in results.iter().filter(|r| !r.matched) {
            warn!(
                check = %mismatch.kind,
                expected = %mismatch.expected,
                actual = %mismatch.actual,
                "integrity mismatch"
            );
        }

        let verdict = Verdict::new(results);
        info!(
            overall = verdict.overall(),
            checks = verdict.checks().len(),
            "integrity verdict"
        );
        Ok(verdict)
    }

    /// Evaluate against the store's current snapshot and build a report
    pub async fn evaluate_report(
        &self,
        checks: &[CheckKind],
        store: &ReferenceStore,
    ) -> VerdictReport {
        let snapshot = store.snapshot();
        let outcome = self.evaluate(checks, &snapshot).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "integrity evaluation failed");
        }
        VerdictReport::from_outcome(&outcome)
    }

    /// Compute the current value for one check
    pub async fn measure(&self, check: &CheckKind) -> Result<String> {
        match check {
            CheckKind::BundleIdentity => self
                .bundle
                .identifier()
                .ok_or(IntegrityError::BundleIdentityUnavailable),
            CheckKind::ProvisionFile => {
                let path = self.bundle.provisioning_profile().ok_or_else(|| {
                    IntegrityError::FileNotFound {
                        path: PROVISIONING_PROFILE_NAME.into(),
                    }
                })?;
                Ok(self.hasher.hash_file(&path).await?.digest_hex)
            }
            CheckKind::NamedImage(name) => Ok(self
                .hasher
                .hash_image(&BinaryImageRef::Named(name.clone()))
                .await?
                .digest_hex),
            CheckKind::MainImage => Ok(self
                .hasher
                .hash_image(&BinaryImageRef::Main)
                .await?
                .digest_hex),
        }
    }
}

/// Expected value per check, in order, or every missing key.
fn resolve_expected(checks: &[CheckKind], snapshot: &ReferenceSnapshot) -> Result<Vec<String>> {
    let mut expected = Vec::with_capacity(checks.len());
    let mut missing = Vec::new();

    for check in checks {
        let key = check.reference_key();
        match snapshot.value(&key) {
            Some(value) => expected.push(value.to_string()),
            None => {
                let name = key.to_string();
                if !missing.contains(&name) {
                    missing.push(name);
                }
            }
        }
    }

    if missing.is_empty() {
        Ok(expected)
    } else {
        Err(IntegrityError::InsufficientReferenceData { missing })
    }
}
