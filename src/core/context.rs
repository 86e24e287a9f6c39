//! Workspace context shared by every command
//!
//! Holds only what is safe to load before the clean check: the root path and
//! relay.toml. Cargo metadata is loaded later, during discovery, because
//! `cargo metadata` may write Cargo.lock.

use crate::core::config::RelayConfig;
use crate::core::error::{RelayError, RelayResult, ValidationError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct WorkspaceContext {
  /// Workspace root directory (absolute path)
  pub root: PathBuf,

  /// relay.toml, or defaults when absent
  pub config: RelayConfig,
}

impl WorkspaceContext {
  /// Build context for the workspace rooted at `workspace_root`
  pub fn build(workspace_root: &Path) -> RelayResult<Self> {
    let root = workspace_root.canonicalize()?;

    if !root.join("Cargo.toml").is_file() {
      return Err(RelayError::Validation(ValidationError::WorkspaceInvalid {
        reason: format!("no Cargo.toml in {}; run cargo relay from the workspace root", root.display()),
      }));
    }

    let config = RelayConfig::load(&root)?;
    Ok(Self { root, config })
  }

  pub fn workspace_root(&self) -> &Path {
    &self.root
  }
}
