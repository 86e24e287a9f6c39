//! Cargo workspace integration
//!
//! - **metadata**: Load and query workspace members using cargo_metadata

pub mod metadata;
