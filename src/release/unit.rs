//! Publishable units and the ordered workspace they belong to

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// One independently publishable package
///
/// Discovered once, consumed exactly once by the publish loop, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishableUnit {
  pub name: String,
  /// `None` only for a bare workspace root with no `[package]`
  pub version: Option<semver::Version>,
  /// Directory the publish command runs in
  pub dir: PathBuf,
  /// Workspace members that must already be on the registry
  pub depends_on: Vec<String>,
}

impl fmt::Display for PublishableUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{} ({})", self.name, version),
      None => write!(f, "{}", self.name),
    }
  }
}

/// Units in dependency order plus the root target published last
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workspace {
  pub root: PathBuf,
  pub units: Vec<PublishableUnit>,
  pub root_unit: Option<PublishableUnit>,
}

impl Workspace {
  /// Number of publish invocations a full run makes
  pub fn publish_count(&self) -> usize {
    self.units.len() + usize::from(self.root_unit.is_some())
  }

  /// Stable identifier for this exact publish sequence
  pub fn plan_id(&self) -> String {
    let mut hasher = Sha256::new();
    for unit in self.units.iter().chain(self.root_unit.iter()) {
      hasher.update(unit.name.as_bytes());
      hasher.update(b"@");
      if let Some(version) = &unit.version {
        hasher.update(version.to_string().as_bytes());
      }
      hasher.update(b"\n");
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
  }
}

/// JSON shape of `cargo relay publish --plan --json`
#[derive(Debug, Serialize)]
pub struct PlanReport<'a> {
  pub plan_id: String,
  pub publish_count: usize,
  #[serde(flatten)]
  pub workspace: &'a Workspace,
}

impl<'a> PlanReport<'a> {
  pub fn new(workspace: &'a Workspace) -> Self {
    Self {
      plan_id: workspace.plan_id(),
      publish_count: workspace.publish_count(),
      workspace,
    }
  }
}
