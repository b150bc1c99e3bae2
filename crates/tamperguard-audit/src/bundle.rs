//! Host application bundle introspection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the provisioning artifact inside a bundle
pub const PROVISIONING_PROFILE_NAME: &str = "embedded.mobileprovision";

/// What the host platform reports about the running application.
pub trait AppBundle: Send + Sync {
    /// Application identity string (e.g. `com.example.app`)
    fn identifier(&self) -> Option<String>;

    /// Path of the embedded provisioning artifact
    fn provisioning_profile(&self) -> Option<PathBuf>;
}

/// Bundle description assembled from configuration.
///
/// The provisioning artifact defaults to `embedded.mobileprovision` in the
/// bundle directory, which itself defaults to the executable's directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleInfo {
    /// Application identity
    #[serde(default)]
    pub identifier: Option<String>,

    /// Bundle root directory
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Explicit provisioning artifact path
    #[serde(default)]
    pub provisioning_profile: Option<PathBuf>,
}

impl BundleInfo {
    /// Bundle rooted at the running executable's directory
    #[must_use]
    pub fn current() -> Self {
        Self {
            directory: std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(PathBuf::from)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    #[must_use]
    pub fn with_provisioning_profile(mut self, path: impl Into<PathBuf>) -> Self {
        self.provisioning_profile = Some(path.into());
        self
    }

    /// Fill unset fields from `fallback`
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            identifier: self.identifier.or(fallback.identifier),
            directory: self.directory.or(fallback.directory),
            provisioning_profile: self.provisioning_profile.or(fallback.provisioning_profile),
        }
    }
}

impl AppBundle for BundleInfo {
    fn identifier(&self) -> Option<String> {
        self.identifier.clone().filter(|id| !id.is_empty())
    }

    fn provisioning_profile(&self) -> Option<PathBuf> {
        self.provisioning_profile.clone().or_else(|| {
            self.directory
                .as_ref()
                .map(|dir| dir.join(PROVISIONING_PROFILE_NAME))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults_to_bundle_directory() {
        let bundle = BundleInfo::default().with_directory("/apps/Demo.app");
        assert_eq!(
            bundle.provisioning_profile(),
            Some(PathBuf::from("/apps/Demo.app/embedded.mobileprovision"))
        );
    }

    #[test]
    fn explicit_profile_wins() {
        let bundle = BundleInfo::default()
            .with_directory("/apps/Demo.app")
            .with_provisioning_profile("/tmp/profile");
        assert_eq!(bundle.provisioning_profile(), Some(PathBuf::from("/tmp/profile")));
    }

    #[test]
    fn empty_identifier_is_unavailable() {
        assert_eq!(BundleInfo::default().with_identifier("").identifier(), None);
        assert_eq!(
            BundleInfo::default().with_identifier("com.example.app").identifier(),
            Some("com.example.app".into())
        );
    }

    #[test]
    fn or_fills_missing_fields() {
        let merged = BundleInfo::default()
            .with_identifier("com.a")
            .or(BundleInfo::default().with_identifier("com.b").with_directory("/d"));
        assert_eq!(merged.identifier.as_deref(), Some("com.a"));
        assert_eq!(merged.directory, Some(PathBuf::from("/d")));
    }

    #[test]
    fn current_uses_executable_directory() {
        let bundle = BundleInfo::current();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(bundle.directory.as_deref(), exe.parent());
    }
}
