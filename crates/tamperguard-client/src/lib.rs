//! HTTP client for published reference values.
//!
//! This crate provides [`ReferenceClient`], which retrieves one expected
//! value per [`ReferenceKey`](tamperguard_core::ReferenceKey) with a plain
//! GET, and [`EndpointConfig`], which maps keys to URLs.
//!
//! Requests always bypass caches: a stale cached reference could mask a
//! modified artifact.

#![doc(html_root_url = "https://docs.rs/tamperguard-client/0.1.0")]

mod client;
mod config;

pub use client::{ReferenceClient, ReferenceClientBuilder, ReferenceFetcher, DEFAULT_TIMEOUT};
pub use config::*;
pub use tamperguard_core::{IntegrityError, Result};
