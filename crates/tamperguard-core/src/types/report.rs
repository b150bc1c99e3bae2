//! Boundary-facing verdict structure, independent of presentation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Verdict;
use crate::IntegrityError;

/// Why an evaluation produced no verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportError {
    /// A requested check had no reference value
    InsufficientReferenceData,
    /// A binary image could not be resolved
    ImageNotFound,
    /// A file could not be found or read
    FileReadError,
    /// The host did not report an application identity
    BundleIdentityUnavailable,
    /// Any other failure
    Other,
}

impl From<&IntegrityError> for ReportError {
    fn from(err: &IntegrityError) -> Self {
        match err {
            IntegrityError::InsufficientReferenceData { .. } => Self::InsufficientReferenceData,
            IntegrityError::ImageNotFound { .. } => Self::ImageNotFound,
            IntegrityError::FileNotFound { .. } | IntegrityError::FileRead { .. } => {
                Self::FileReadError
            }
            IntegrityError::BundleIdentityUnavailable => Self::BundleIdentityUnavailable,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientReferenceData => write!(f, "InsufficientReferenceData"),
            Self::ImageNotFound => write!(f, "ImageNotFound"),
            Self::FileReadError => write!(f, "FileReadError"),
            Self::BundleIdentityUnavailable => write!(f, "BundleIdentityUnavailable"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// One row of a reported verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub kind: String,
    pub expected: String,
    pub actual: String,
    pub matched: bool,
}

/// Reported outcome of one evaluation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictReport {
    /// True only when a verdict was produced and every check matched
    pub overall: bool,

    /// Per-check rows (empty when `error` is set)
    pub checks: Vec<CheckReport>,

    /// Set when the evaluation failed before a verdict existed
    pub error: Option<ReportError>,

    /// Human-readable failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerdictReport {
    /// Build a report from an evaluation outcome
    #[must_use]
    pub fn from_outcome(outcome: &Result<Verdict, IntegrityError>) -> Self {
        match outcome {
            Ok(verdict) => Self::from(verdict),
            Err(err) => Self::failed(err),
        }
    }

    /// Build a report for an evaluation that produced no verdict
    #[must_use]
    pub fn failed(err: &IntegrityError) -> Self {
        Self {
            overall: false,
            checks: Vec::new(),
            error: Some(ReportError::from(err)),
            message: Some(err.to_string()),
        }
    }

    /// True if a verdict exists and some check mismatched
    #[must_use]
    pub fn is_tampered(&self) -> bool {
        self.error.is_none() && !self.overall
    }
}

impl From<&Verdict> for VerdictReport {
    fn from(verdict: &Verdict) -> Self {
        Self {
            overall: verdict.overall(),
            checks: verdict
                .checks()
                .iter()
                .map(|c| CheckReport {
                    kind: c.kind.to_string(),
                    expected: c.expected.clone(),
                    actual: c.actual.clone(),
                    matched: c.matched,
                })
                .collect(),
            error: None,
            message: None,
        }
    }
}
