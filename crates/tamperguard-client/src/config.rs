//! Endpoint configuration: which URL serves which reference key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tamperguard_core::{IntegrityError, ReferenceKey, Result};
use url::Url;

/// Placeholder substituted with a key's resource name
pub const KEY_PLACEHOLDER: &str = "{key}";

/// Published values layout: one plain-text file per key
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/Xplo8E/IOSSecuritySuiteAPP/master/Values/{key}";

/// Module whose image hash is published as plain `MachOHash`
pub const DEFAULT_MODULE: &str = "IOSSecuritySuite";

/// A key and the URL its value is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub key: ReferenceKey,
    pub url: Url,
}

impl RemoteEndpoint {
    /// Create an endpoint, validating the URL
    pub fn new(key: ReferenceKey, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| IntegrityError::InvalidUrl(format!("{url}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(Self { key, url }),
            other => Err(IntegrityError::InvalidUrl(format!(
                "{url}: unsupported scheme '{other}'"
            ))),
        }
    }
}

/// Maps reference keys to fetch URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// URL template containing `{key}`
    #[serde(default = "default_url_template")]
    pub url_template: String,

    /// Explicit per-key URLs, taking precedence over the template
    #[serde(default)]
    pub endpoints: BTreeMap<ReferenceKey, String>,

    /// Module published without a name suffix
    #[serde(default = "default_module")]
    pub default_module: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            endpoints: BTreeMap::new(),
            default_module: default_module(),
        }
    }
}

impl EndpointConfig {
    /// Use a different URL template
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Pin one key to an explicit URL
    #[must_use]
    pub fn with_endpoint(mut self, key: ReferenceKey, url: impl Into<String>) -> Self {
        self.endpoints.insert(key, url.into());
        self
    }

    /// Name a key is published under in the template layout
    #[must_use]
    pub fn resource_name(&self, key: &ReferenceKey) -> String {
        match key {
            ReferenceKey::BundleId => "BundleId".to_string(),
            ReferenceKey::ProvisionHash => "ProvisionHash".to_string(),
            ReferenceKey::MainImageHash => "MainBinaryHash".to_string(),
            ReferenceKey::ImageHash(name) if *name == self.default_module => {
                "MachOHash".to_string()
            }
            ReferenceKey::ImageHash(name) => format!("MachOHash-{name}"),
        }
    }

    /// Resolve the endpoint for one key
    pub fn endpoint(&self, key: &ReferenceKey) -> Result<RemoteEndpoint> {
        if let Some(url) = self.endpoints.get(key) {
            return RemoteEndpoint::new(key.clone(), url);
        }

        if !self.url_template.contains(KEY_PLACEHOLDER) {
            return Err(IntegrityError::Config(format!(
                "url template '{}' has no {KEY_PLACEHOLDER} placeholder",
                self.url_template
            )));
        }

        let resource = self.resource_name(key);
        let url = self.url_template.replace(KEY_PLACEHOLDER, &resource);
        RemoteEndpoint::new(key.clone(), &url)
    }

    /// Resolve endpoints for several keys, failing on the first bad one
    pub fn endpoints_for<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a ReferenceKey>,
    ) -> Result<Vec<RemoteEndpoint>> {
        keys.into_iter().map(|k| self.endpoint(k)).collect()
    }
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}
