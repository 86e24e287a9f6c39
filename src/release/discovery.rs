//! Publishable unit discovery
//!
//! Two sources produce the same [`Workspace`]:
//!
//! - [`MetadataSource`] (default): `cargo metadata` + topological sort. Typed
//!   records, nothing to scrape.
//! - [`ListingSource`]: text output of an external listing command (for
//!   example `cargo workspaces list`), kept in printed order. Column labels
//!   equal to the configured header token are dropped.
//!
//! Both resolve names against workspace metadata, so every unit has a real
//! directory and version.

use crate::cargo::metadata::{MemberInfo, WorkspaceMetadata};
use crate::core::config::{PublishConfig, RootPublish};
use crate::core::error::{ConfigError, RelayError, RelayResult};
use crate::core::executor::{CommandRunner, Invocation};
use crate::graph::CrateGraph;
use crate::release::unit::{PublishableUnit, Workspace};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Enumerates publishable units in dependency order
pub trait UnitSource {
  fn discover(&mut self) -> RelayResult<Workspace>;
}

/// Structured discovery through `cargo metadata`
pub struct MetadataSource {
  root: PathBuf,
  config: PublishConfig,
}

impl MetadataSource {
  pub fn new(root: &Path, config: &PublishConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      config: config.clone(),
    }
  }
}

impl UnitSource for MetadataSource {
  fn discover(&mut self) -> RelayResult<Workspace> {
    let metadata = WorkspaceMetadata::load(&self.root)?;
    let members = metadata.members();
    let order = CrateGraph::from_members(&members).publish_order()?;
    assemble(&self.root, &members, metadata.root_package_name().as_deref(), &order, &self.config)
  }
}

/// Discovery by scraping an external listing command's stdout
///
/// The runner must capture stdout (`SystemRunner::capturing_stdout`). Listing
/// is a read-only query, so it runs for real even during a dry run.
pub struct ListingSource {
  root: PathBuf,
  config: PublishConfig,
  runner: Box<dyn CommandRunner>,
}

impl ListingSource {
  pub fn new(root: &Path, config: &PublishConfig, runner: Box<dyn CommandRunner>) -> Self {
    Self {
      root: root.to_path_buf(),
      config: config.clone(),
      runner,
    }
  }

  /// Unit names in listing order, header token dropped
  pub fn list_names(&mut self) -> RelayResult<Vec<String>> {
    let invocation = Invocation::from_argv(&self.config.listing_command, &self.root)?;
    let outcome = self.runner.run(&invocation)?.into_result(&invocation)?;
    Ok(parse_listing(&outcome.stdout, &self.config.header_token))
  }
}

impl UnitSource for ListingSource {
  fn discover(&mut self) -> RelayResult<Workspace> {
    let order = self.list_names()?;

    let metadata = WorkspaceMetadata::load(&self.root)?;
    let members = metadata.members();
    assemble(&self.root, &members, metadata.root_package_name().as_deref(), &order, &self.config)
  }
}

/// Extract unit names from listing output
///
/// Takes the first whitespace-delimited column of each non-empty line, drops
/// entries equal to `header_token`, and keeps the first occurrence of each name.
pub fn parse_listing(stdout: &str, header_token: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  stdout
    .lines()
    .filter_map(|line| line.split_whitespace().next())
    .filter(|entry| *entry != header_token)
    .filter(|entry| seen.insert(entry.to_string()))
    .map(str::to_string)
    .collect()
}

/// Turn an ordered list of names into a [`Workspace`]
///
/// The root package never appears among the units. Excluded and
/// `publish = false` members are skipped. Names that are not workspace
/// members are an error.
pub fn assemble(
  root: &Path,
  members: &[MemberInfo],
  root_package: Option<&str>,
  order: &[String],
  config: &PublishConfig,
) -> RelayResult<Workspace> {
  let excluded: HashSet<&str> = config.exclude.iter().map(String::as_str).collect();

  let mut units = Vec::new();
  for name in order {
    let member = members.iter().find(|m| &m.name == name).ok_or_else(|| {
      RelayError::Config(ConfigError::CrateNotFound { name: name.clone() })
    })?;

    if Some(member.name.as_str()) == root_package || excluded.contains(member.name.as_str()) || !member.publishable {
      continue;
    }

    units.push(to_unit(member));
  }

  let root_member = root_package.and_then(|name| members.iter().find(|m| m.name == name));
  let root_unit = match config.root {
    RootPublish::Never => None,
    RootPublish::Auto => root_member
      .filter(|m| m.publishable && !excluded.contains(m.name.as_str()))
      .map(to_unit),
    RootPublish::Always => Some(root_member.map(to_unit).unwrap_or_else(|| bare_root(root))),
  };

  Ok(Workspace {
    root: root.to_path_buf(),
    units,
    root_unit,
  })
}

fn to_unit(member: &MemberInfo) -> PublishableUnit {
  PublishableUnit {
    name: member.name.clone(),
    version: Some(member.version.clone()),
    dir: member.dir.clone(),
    depends_on: member.publish_deps.clone(),
  }
}

fn bare_root(root: &Path) -> PublishableUnit {
  PublishableUnit {
    name: root
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "workspace root".to_string()),
    version: None,
    dir: root.to_path_buf(),
    depends_on: Vec::new(),
  }
}
