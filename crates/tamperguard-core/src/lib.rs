//! Core types and error taxonomy for tamperguard.
//!
//! This crate provides the foundational types shared by every other crate:
//!
//! - **Types**: reference keys and values, image references, hash results,
//!   check kinds, verdicts and the boundary-facing [`VerdictReport`]
//! - **Errors**: a single error enum, [`IntegrityError`]
//!
//! # Example
//!
//! ```rust
//! use tamperguard_core::{CheckKind, ReferenceKey};
//!
//! let check = CheckKind::NamedImage("IOSSecuritySuite".into());
//! assert_eq!(
//!     check.reference_key(),
//!     ReferenceKey::ImageHash("IOSSecuritySuite".into())
//! );
//! assert_eq!(check.reference_key().to_string(), "machOHash:IOSSecuritySuite");
//! ```

#![doc(html_root_url = "https://docs.rs/tamperguard-core/0.1.0")]

mod error;
pub mod types;

pub use error::{IntegrityError, Result};
pub use types::*;
