use crate::core::error::{ConfigError, RelayError, RelayResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for cargo-relay
/// Searched in order: relay.toml, .relay.toml, .cargo/relay.toml, .config/relay.toml
///
/// Every section is optional; a workspace without a config file gets the
/// defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
  pub tasks: TaskConfig,
  pub publish: PublishConfig,
}

/// Flags applied uniformly to the lint/test/doc recipes
///
/// # Example
///
/// ```toml
/// [tasks]
/// features = "all"          # or "default", or ["serde", "macros"]
/// targets = "all"           # or "default"
/// no_deps_for_docs = true
/// udeps_toolchain = "nightly"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
  pub features: FeatureSet,
  pub targets: TargetSet,
  pub no_deps_for_docs: bool,
  pub udeps_toolchain: String,
}

impl Default for TaskConfig {
  fn default() -> Self {
    Self {
      features: FeatureSet::Preset(FeaturePreset::All),
      targets: TargetSet::All,
      no_deps_for_docs: true,
      udeps_toolchain: "nightly".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureSet {
  Preset(FeaturePreset),
  List(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturePreset {
  All,
  Default,
}

impl FeatureSet {
  /// Cargo flags selecting these features
  pub fn args(&self) -> Vec<String> {
    match self {
      FeatureSet::Preset(FeaturePreset::All) => vec!["--all-features".to_string()],
      FeatureSet::Preset(FeaturePreset::Default) => Vec::new(),
      FeatureSet::List(list) if list.is_empty() => Vec::new(),
      FeatureSet::List(list) => vec!["--features".to_string(), list.join(",")],
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSet {
  All,
  Default,
}

impl TargetSet {
  pub fn args(&self) -> Vec<String> {
    match self {
      TargetSet::All => vec!["--all-targets".to_string()],
      TargetSet::Default => Vec::new(),
    }
  }
}

/// Release orchestration settings
///
/// # Example
///
/// ```toml
/// [publish]
/// command = ["cargo", "publish"]
/// delay_secs = 10
/// max_delay_secs = 600
/// root = "auto"
/// exclude = ["xtask"]
/// discovery = "metadata"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
  /// Program and leading arguments used to publish one unit
  pub command: Vec<String>,

  /// Pause between consecutive publish invocations
  pub delay_secs: u64,

  /// Upper bound for registry-provided back-off hints
  pub max_delay_secs: u64,

  /// Whether the package at the workspace root is published last
  pub root: RootPublish,

  /// Workspace members never published
  pub exclude: Vec<String>,

  /// Where the publish order comes from
  pub discovery: DiscoverySource,

  /// External command whose text output lists units (listing discovery only)
  pub listing_command: Vec<String>,

  /// Column label printed by the listing command; never treated as a unit
  pub header_token: String,
}

impl Default for PublishConfig {
  fn default() -> Self {
    Self {
      command: vec!["cargo".to_string(), "publish".to_string()],
      delay_secs: 10,
      max_delay_secs: 600,
      root: RootPublish::Auto,
      exclude: Vec::new(),
      discovery: DiscoverySource::Metadata,
      listing_command: vec!["cargo".to_string(), "workspaces".to_string(), "list".to_string()],
      header_token: "name".to_string(),
    }
  }
}

impl PublishConfig {
  pub fn delay(&self) -> Duration {
    Duration::from_secs(self.delay_secs)
  }

  pub fn max_delay(&self) -> Duration {
    Duration::from_secs(self.max_delay_secs)
  }

  /// Validate publish configuration
  pub fn validate(&self) -> RelayResult<()> {
    if self.command.is_empty() || self.command[0].trim().is_empty() {
      return Err(invalid("publish.command", "must name a program"));
    }

    if self.max_delay_secs < self.delay_secs {
      return Err(invalid(
        "publish.max_delay_secs",
        format!(
          "must be at least delay_secs ({} < {})",
          self.max_delay_secs, self.delay_secs
        ),
      ));
    }

    if self.discovery == DiscoverySource::Listing {
      if self.listing_command.is_empty() {
        return Err(invalid("publish.listing_command", "must name a program"));
      }
      if self.header_token.trim().is_empty() {
        return Err(invalid("publish.header_token", "must not be empty"));
      }
    }

    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootPublish {
  /// Publish the root only if the root manifest has a `[package]`
  Auto,
  Always,
  Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoverySource {
  /// `cargo metadata` plus a topological sort
  Metadata,
  /// Text output of `listing_command`, kept in printed order
  Listing,
}

fn invalid(field: &str, reason: impl Into<String>) -> RelayError {
  RelayError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.into(),
  })
}

impl RelayConfig {
  /// Find config file in search order: relay.toml, .relay.toml, .cargo/relay.toml, .config/relay.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("relay.toml"),
      path.join(".relay.toml"),
      path.join(".cargo").join("relay.toml"),
      path.join(".config").join("relay.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  pub fn load(path: &Path) -> RelayResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> RelayResult<Self> {
    let config: RelayConfig = toml_edit::de::from_str(content)?;
    config.publish.validate()?;
    Ok(config)
  }
}
