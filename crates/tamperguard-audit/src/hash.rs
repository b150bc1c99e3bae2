//! Streaming SHA-256 hashing via `ring::digest`.

use ring::digest::{Context, SHA256};
use std::path::Path;
use std::sync::Arc;
use tamperguard_core::{BinaryImageRef, HashResult, IntegrityError, Result};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::image::ImageLocator;

/// Buffer size for streaming file reads (64 KiB).
const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file, streaming to avoid loading it all into memory.
///
/// The raw bytes are hashed with no normalization. A missing file is
/// `FileNotFound`; any other I/O failure is `FileRead`.
pub async fn sha256_file(path: &Path) -> Result<HashResult> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| IntegrityError::io(path, e))?;

    let mut context = Context::new(&SHA256);
    let mut buf = vec![0u8; BUF_SIZE];

    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| IntegrityError::io(path, e))?;
        if n == 0 {
            break;
        }
        context.update(&buf[..n]);
    }

    let digest = context.finish();
    Ok(HashResult::sha256(hex::encode(digest.as_ref())))
}

/// Compute SHA-256 of raw bytes.
#[must_use]
pub fn sha256_bytes(data: &[u8]) -> HashResult {
    let digest = ring::digest::digest(&SHA256, data);
    HashResult::sha256(hex::encode(digest.as_ref()))
}

/// Digests binary images and files. Nothing is cached; every call rereads.
#[derive(Clone)]
pub struct BinaryHasher {
    locator: Arc<dyn ImageLocator>,
}

impl BinaryHasher {
    /// Create a hasher resolving images through `locator`
    pub fn new(locator: impl ImageLocator + 'static) -> Self {
        Self {
            locator: Arc::new(locator),
        }
    }

    /// Hash the image the locator resolves `image` to.
    ///
    /// Fails with `ImageNotFound` when the image cannot be resolved or its
    /// backing file has disappeared.
    pub async fn hash_image(&self, image: &BinaryImageRef) -> Result<HashResult> {
        let path = self.locator.locate(image)?;
        debug!(image = %image, path = %path.display(), "hashing image");

        sha256_file(&path).await.map_err(|e| match e {
            IntegrityError::FileNotFound { path } => IntegrityError::ImageNotFound {
                image: format!("{image} ({})", path.display()),
            },
            other => other,
        })
    }

    /// Hash an arbitrary file's raw bytes.
    pub async fn hash_file(&self, path: &Path) -> Result<HashResult> {
        debug!(path = %path.display(), "hashing file");
        sha256_file(path).await
    }
}
