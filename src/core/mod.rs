//! Core building blocks shared by every cargo-relay command
//!
//! - **config**: relay.toml parsing and validation
//! - **context**: workspace root plus configuration, built once in main.rs
//! - **error**: error types with contextual help and exit codes
//! - **executor**: external command invocations and the runner seam
//! - **vcs**: working-tree status through the git CLI

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod vcs;
