//! Binary integrity verification engine.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tamperguard::{
//!     BinaryHasher, BundleInfo, CheckPreset, EndpointConfig, ProcessImageLocator,
//!     ReferenceClient, ReferenceKey, ReferenceSource, ReferenceStore, TamperEvaluator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> tamperguard::Result<()> {
//!     let store = ReferenceStore::new(ReferenceClient::new()?);
//!     let keys = [ReferenceKey::BundleId, ReferenceKey::MainImageHash];
//!     let endpoints = EndpointConfig::default().endpoints_for(&keys)?;
//!     store.load(ReferenceSource::Remote(endpoints)).await;
//!
//!     let evaluator = TamperEvaluator::new(
//!         BinaryHasher::new(ProcessImageLocator::new()),
//!         BundleInfo::current().with_identifier("com.example.app"),
//!     );
//!
//!     let checks = [tamperguard::CheckKind::BundleIdentity, tamperguard::CheckKind::MainImage];
//!     let verdict = evaluator.evaluate(&checks, &store.snapshot()).await?;
//!     println!("intact: {}", verdict.overall());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/tamperguard/0.1.0")]

// Re-export core types
pub use tamperguard_core::*;

// Re-export client
pub use tamperguard_client::{
    EndpointConfig, ReferenceClient, ReferenceClientBuilder, ReferenceFetcher, RemoteEndpoint,
};

// Re-export the engine
pub use tamperguard_audit::{
    sha256_bytes, sha256_file, AppBundle, BinaryHasher, BundleInfo, CheckPreset, ImageLocator,
    LoadSummary, ProcessImageLocator, ReferenceSnapshot, ReferenceSource, ReferenceStore,
    TamperEvaluator,
};

// Re-export runtime for convenience
pub use serde_json;
pub use tokio;
