//! # tamperguard-audit
//!
//! Binary integrity verification.
//!
//! Trust measurements, not the artifact. The running executable, its loaded
//! modules and its provisioning artifact are hashed fresh on every request
//! and compared byte-for-byte with reference values published out of band.
//!
//! ## Data Flow
//!
//! ```text
//! Load (network or config)
//!   ReferenceStore::load(Static | Remote)
//!   -> one fetch per key, concurrent, absent on failure
//!   -> ReferenceSnapshot swapped in atomically
//!
//! Measure (local)
//!   BinaryHasher::hash_image(Main | Named)   via ImageLocator
//!   BinaryHasher::hash_file(provisioning)    via AppBundle
//!   AppBundle::identifier()
//!
//! Evaluate
//!   TamperEvaluator::evaluate(checks, &snapshot)
//!   -> Verdict { overall = AND(matched) }
//!   -> or InsufficientReferenceData / ImageNotFound / FileReadError
//! ```

pub mod bundle;
pub mod evaluate;
pub mod hash;
pub mod image;
pub mod store;

pub use bundle::{AppBundle, BundleInfo, PROVISIONING_PROFILE_NAME};
pub use evaluate::{CheckPreset, TamperEvaluator};
pub use hash::{sha256_bytes, sha256_file, BinaryHasher};
pub use image::{ImageLocator, ProcessImageLocator};
pub use store::{LoadSummary, ReferenceSnapshot, ReferenceSource, ReferenceStore};
pub use tamperguard_core::{IntegrityError, Result};
