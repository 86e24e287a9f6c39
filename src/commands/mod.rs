//! CLI commands for cargo-relay
//!
//! - **publish**: dependency-ordered publishing of every workspace crate
//! - **tasks**: `ci`, `lint`, `lintmut`, `test`, `doc`, `doc-open`, `udeps`, `clean`
//!
//! All commands accept `&WorkspaceContext`, built once in main.rs.

pub mod publish;
pub mod tasks;

pub use publish::{PublishOptions, run_publish};
pub use tasks::run_task;
