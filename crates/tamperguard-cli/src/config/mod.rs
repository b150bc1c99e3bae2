//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tamperguard::{BundleInfo, EndpointConfig, ReferenceKey, ReferenceValue};

use crate::output::OutputFormat;

/// Where reference values come from by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Fetch every key over HTTP
    #[default]
    Remote,
    /// Use `static_values`
    Static,
}

/// Reference value settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencesConfig {
    /// Default source
    #[serde(default)]
    pub source: SourceKind,

    /// URL template, per-key overrides and default module
    #[serde(flatten)]
    pub endpoints: EndpointConfig,

    /// Per-fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Values used by the static source
    #[serde(default)]
    pub static_values: BTreeMap<ReferenceKey, String>,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            endpoints: EndpointConfig::default(),
            timeout_secs: default_timeout_secs(),
            static_values: BTreeMap::new(),
        }
    }
}

impl ReferencesConfig {
    /// Static values as reference entries
    pub fn static_entries(&self) -> Vec<ReferenceValue> {
        self.static_values
            .iter()
            .map(|(k, v)| ReferenceValue::new(k.clone(), v.clone()))
            .collect()
    }
}

/// Image path overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// File to hash as the main executable
    #[serde(default)]
    pub main: Option<PathBuf>,

    /// Module name -> file
    #[serde(default)]
    pub modules: BTreeMap<String, PathBuf>,
}

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Reference value source.
    #[serde(default)]
    pub references: ReferencesConfig,

    /// Application bundle layout.
    #[serde(default)]
    pub bundle: BundleInfo,

    /// Image path overrides.
    #[serde(default)]
    pub images: ImagesConfig,
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "tamperguard", "tamperguard")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;

        Ok(config.expand_paths())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set one dotted key from a string value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "url_template" | "references.url_template" => {
                self.references.endpoints.url_template = value.to_string();
            }
            "default_module" | "references.default_module" => {
                self.references.endpoints.default_module = value.to_string();
            }
            "timeout_secs" | "references.timeout_secs" => {
                self.references.timeout_secs = value.parse()?;
            }
            "source" | "references.source" => {
                self.references.source = match value {
                    "remote" => SourceKind::Remote,
                    "static" => SourceKind::Static,
                    other => anyhow::bail!("Unknown source: {other} (expected remote or static)"),
                };
            }
            "bundle.identifier" | "bundle_id" => {
                self.bundle.identifier = Some(value.to_string());
            }
            "bundle.directory" => self.bundle.directory = Some(expand(value)),
            "bundle.provisioning_profile" => {
                self.bundle.provisioning_profile = Some(expand(value));
            }
            "images.main" => self.images.main = Some(expand(value)),
            other => {
                if let Some(module) = other.strip_prefix("images.modules.") {
                    self.images.modules.insert(module.to_string(), expand(value));
                } else if let Some(key) = other.strip_prefix("references.static_values.") {
                    self.references
                        .static_values
                        .insert(key.parse()?, value.to_string());
                } else if let Some(key) = other.strip_prefix("references.endpoints.") {
                    self.references
                        .endpoints
                        .endpoints
                        .insert(key.parse()?, value.to_string());
                } else {
                    anyhow::bail!(
                        "Unknown config key: {other}\n\n\
                         Available keys:\n  \
                         output_format                      - pretty/json\n  \
                         url_template                       - Reference URL template with {{key}}\n  \
                         default_module                     - Module checked by default\n  \
                         timeout_secs                       - Per-fetch timeout\n  \
                         source                             - remote/static\n  \
                         bundle.identifier                  - Application identity\n  \
                         bundle.directory                   - Bundle root directory\n  \
                         bundle.provisioning_profile        - Provisioning artifact path\n  \
                         images.main                        - Main executable override\n  \
                         images.modules.<name>              - Module path override\n  \
                         references.static_values.<key>     - Static reference value\n  \
                         references.endpoints.<key>         - Per-key URL"
                    );
                }
            }
        }
        Ok(())
    }

    fn expand_paths(mut self) -> Self {
        let expand_opt = |p: Option<PathBuf>| p.map(|p| expand(&p.to_string_lossy()));
        self.bundle.directory = expand_opt(self.bundle.directory);
        self.bundle.provisioning_profile = expand_opt(self.bundle.provisioning_profile);
        self.images.main = expand_opt(self.images.main);
        for path in self.images.modules.values_mut() {
            *path = expand(&path.to_string_lossy());
        }
        self
    }
}

/// Expand `~` and environment variables in a configured path.
fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::full(path).map_or_else(|_| path.into(), |p| p.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.references.source, SourceKind::Remote);
        assert_eq!(config.references.timeout_secs, 10);
        assert!(config.references.static_values.is_empty());
        assert!(config.bundle.identifier.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            output_format = "json"

            [references]
            source = "static"
            url_template = "https://refs.example/{key}"
            default_module = "Kit"
            timeout_secs = 3

            [references.static_values]
            bundleId = "com.example.app"
            "machOHash:Kit" = "bb"

            [references.endpoints]
            mainBinaryHash = "https://pinned.example/main"

            [bundle]
            identifier = "com.example.app"
            directory = "/apps/Demo.app"

            [images.modules]
            Kit = "/apps/Demo.app/Frameworks/Kit.framework/Kit"
        "#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.output_format, Some(OutputFormat::Json));
        assert_eq!(config.references.source, SourceKind::Static);
        assert_eq!(config.references.endpoints.default_module, "Kit");
        assert_eq!(config.references.timeout_secs, 3);
        assert_eq!(
            config.references.static_values[&ReferenceKey::ImageHash("Kit".into())],
            "bb"
        );
        assert_eq!(config.references.static_entries().len(), 2);
        assert_eq!(
            config.references.endpoints.endpoints[&ReferenceKey::MainImageHash],
            "https://pinned.example/main"
        );
        assert_eq!(config.bundle.identifier.as_deref(), Some("com.example.app"));
        assert!(config.images.modules.contains_key("Kit"));
    }

    #[test]
    fn test_set_and_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("bundle.identifier", "com.example.app").unwrap();
        config.set("references.static_values.provisionHash", "aa").unwrap();
        config.set("source", "static").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.bundle.identifier.as_deref(), Some("com.example.app"));
        assert_eq!(loaded.references.source, SourceKind::Static);
        assert_eq!(
            loaded.references.static_values[&ReferenceKey::ProvisionHash],
            "aa"
        );
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut config = Config::default();
        assert!(config.set("api_key", "x").is_err());
        assert!(config.set("references.static_values.bogus", "x").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config.references.source, SourceKind::Remote);
    }
}
