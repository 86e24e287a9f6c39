use crate::core::error::RelayResult;
use cargo_metadata::{DependencyKind, MetadataCommand, Package};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Workspace introspection using cargo_metadata
#[derive(Clone)]
pub struct WorkspaceMetadata {
  metadata: cargo_metadata::Metadata,
}

/// The parts of a workspace package the release pipeline looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
  pub name: String,
  pub version: semver::Version,
  /// Directory holding the package's Cargo.toml
  pub dir: PathBuf,
  /// False for `publish = false`
  pub publishable: bool,
  /// Workspace members this package needs published first (normal + build deps)
  pub publish_deps: Vec<String>,
}

impl WorkspaceMetadata {
  /// Runs `cargo metadata --no-deps` against the root manifest
  pub fn load(workspace_root: &Path) -> RelayResult<Self> {
    let metadata = MetadataCommand::new()
      .manifest_path(workspace_root.join("Cargo.toml"))
      .no_deps()
      .exec()?;
    Ok(Self { metadata })
  }

  pub fn list_crates(&self) -> Vec<&Package> {
    self.metadata.workspace_packages()
  }

  pub fn workspace_root(&self) -> &Path {
    self.metadata.workspace_root.as_std_path()
  }

  /// Package whose manifest is the root Cargo.toml (`None` for virtual workspaces)
  pub fn root_package_name(&self) -> Option<String> {
    let root_manifest = self.metadata.workspace_root.join("Cargo.toml");
    self
      .list_crates()
      .into_iter()
      .find(|pkg| pkg.manifest_path == root_manifest)
      .map(|pkg| pkg.name.to_string())
  }

  /// Every workspace member, in `cargo metadata` order
  pub fn members(&self) -> Vec<MemberInfo> {
    let packages = self.list_crates();
    let names: HashSet<String> = packages.iter().map(|pkg| pkg.name.to_string()).collect();

    packages
      .into_iter()
      .map(|pkg| {
        let mut publish_deps: Vec<String> = pkg
          .dependencies
          .iter()
          .filter(|dep| matches!(dep.kind, DependencyKind::Normal | DependencyKind::Build))
          .map(|dep| dep.name.to_string())
          .filter(|name| names.contains(name))
          .collect();
        publish_deps.sort();
        publish_deps.dedup();

        MemberInfo {
          name: pkg.name.to_string(),
          version: pkg.version.clone(),
          dir: pkg
            .manifest_path
            .parent()
            .map(|p| p.as_std_path().to_path_buf())
            .unwrap_or_else(|| self.workspace_root().to_path_buf()),
          publishable: !matches!(&pkg.publish, Some(registries) if registries.is_empty()),
          publish_deps,
        }
      })
      .collect()
  }
}
