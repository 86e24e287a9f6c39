//! Recipe → invocation mapping
//!
//! Each recipe expands to a fixed, ordered list of cargo invocations run at
//! the workspace root. Feature and target selection come from `[tasks]` in
//! relay.toml.

use crate::core::config::TaskConfig;
use crate::core::executor::Invocation;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipe {
  /// `lint` then `test`
  Ci,
  /// Formatting check + clippy with warnings denied
  Lint,
  /// Formatting + clippy autofix, mutating the tree
  LintMut,
  /// Doctests, then workspace tests; optional test name filter
  Test { filter: Option<String> },
  Doc { open: bool },
  Udeps,
  Clean,
}

impl Recipe {
  /// Ordered invocations for this recipe
  pub fn invocations(&self, config: &TaskConfig, root: &Path) -> Vec<Invocation> {
    let cargo = || Invocation::new("cargo", root);
    let features = config.features.args();
    let targets = config.targets.args();

    match self {
      Recipe::Ci => {
        let mut all = Recipe::Lint.invocations(config, root);
        all.extend(Recipe::Test { filter: None }.invocations(config, root));
        all
      }
      Recipe::Lint => vec![
        cargo().args(["fmt", "--all", "--", "--check"]),
        cargo()
          .args(["clippy", "--workspace"])
          .args(targets)
          .args(features)
          .args(["--", "-D", "warnings"]),
      ],
      Recipe::LintMut => vec![
        cargo().args(["fmt", "--all"]),
        cargo()
          .args(["clippy", "--fix", "--allow-dirty", "--allow-staged", "--workspace"])
          .args(targets)
          .args(features),
      ],
      Recipe::Test { filter } => vec![
        cargo()
          .args(["test", "--doc"])
          .args(features.clone())
          .args(filter.iter().cloned()),
        cargo()
          .args(["test", "--workspace"])
          .args(targets)
          .args(features)
          .args(filter.iter().cloned()),
      ],
      Recipe::Doc { open } => {
        let mut doc = cargo().args(["doc", "--workspace"]).args(features);
        if config.no_deps_for_docs {
          doc = doc.arg("--no-deps");
        }
        if *open {
          doc = doc.arg("--open");
        }
        vec![doc]
      }
      Recipe::Udeps => vec![
        cargo()
          .arg(format!("+{}", config.udeps_toolchain))
          .args(["udeps", "--workspace", "--all-targets"])
          .args(features),
      ],
      Recipe::Clean => vec![cargo().arg("clean")],
    }
  }
}

impl fmt::Display for Recipe {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Recipe::Ci => write!(f, "ci"),
      Recipe::Lint => write!(f, "lint"),
      Recipe::LintMut => write!(f, "lintmut"),
      Recipe::Test { filter: Some(filter) } => write!(f, "test {}", filter),
      Recipe::Test { filter: None } => write!(f, "test"),
      Recipe::Doc { open: false } => write!(f, "doc"),
      Recipe::Doc { open: true } => write!(f, "doc-open"),
      Recipe::Udeps => write!(f, "udeps"),
      Recipe::Clean => write!(f, "clean"),
    }
  }
}
