//! Command implementations.

pub mod check;
pub mod config;
pub mod measure;
pub mod references;

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tamperguard::{
    BinaryHasher, BundleInfo, LoadSummary, ProcessImageLocator, ReferenceClient, ReferenceKey,
    ReferenceSource, ReferenceStore, TamperEvaluator,
};

use crate::config::{Config, SourceKind};
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration (file plus CLI overrides)
    pub config: Config,

    /// Where `config set` writes
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,
}

impl Context {
    /// Module used when a command does not name one.
    pub fn module(&self, arg: Option<String>) -> String {
        arg.unwrap_or_else(|| self.config.references.endpoints.default_module.clone())
    }

    /// Bundle description with unset fields taken from the running executable.
    pub fn bundle(&self) -> BundleInfo {
        self.config.bundle.clone().or(BundleInfo::current())
    }

    /// Hasher honouring the configured image overrides.
    pub fn hasher(&self) -> BinaryHasher {
        let images = &self.config.images;
        let mut locator = ProcessImageLocator::new();
        if let Some(main) = &images.main {
            locator = locator.with_main_path(main);
        }
        for (name, path) in &images.modules {
            locator = locator.with_module_path(name, path);
        }
        BinaryHasher::new(locator)
    }

    /// Evaluator over this process and the configured bundle.
    pub fn evaluator(&self) -> TamperEvaluator {
        TamperEvaluator::new(self.hasher(), self.bundle())
    }

    /// Load reference values for `keys` from the configured source.
    pub async fn load_references(
        &self,
        keys: &[ReferenceKey],
    ) -> Result<(ReferenceStore, LoadSummary)> {
        let refs = &self.config.references;

        let (store, source) = match refs.source {
            SourceKind::Remote => {
                let timeout = Duration::from_secs(refs.timeout_secs);
                let client = ReferenceClient::builder().timeout(timeout).build()?;
                (
                    ReferenceStore::new(client).with_fetch_timeout(timeout),
                    ReferenceSource::Configured {
                        endpoints: refs.endpoints.clone(),
                        keys: keys.to_vec(),
                    },
                )
            }
            SourceKind::Static => (
                ReferenceStore::offline(),
                ReferenceSource::Static(refs.static_entries()),
            ),
        };

        let summary = store.load(source).await;
        Ok((store, summary))
    }
}
