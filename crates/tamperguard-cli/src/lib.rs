//! # tamperguard-cli
//!
//! Command-line interface for tamperguard.
//!
//! ## Features
//!
//! - **Verdicts**: `check` runs a preset of integrity checks against
//!   published or configured reference values
//! - **Measurements**: bundle identity, provisioning artifact hash, image
//!   hashes, arbitrary file hashes
//! - **Configuration**: TOML file with reference endpoints, static values
//!   and bundle layout
//! - **Output formats**: colored text or JSON

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
