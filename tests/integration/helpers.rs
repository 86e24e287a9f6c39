//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A committed git workspace at `<tempdir>/ws`
///
/// The temp dir itself sits outside the repository, so tests can write logs
/// there without dirtying the working tree.
pub struct TestWorkspace {
  root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a virtual workspace with `crates/*` members and one commit
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("ws");
    std::fs::create_dir_all(&path)?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      path.join("Cargo.toml"),
      r#"[workspace]
members = ["crates/*"]
resolver = "2"

[workspace.package]
edition = "2021"
license = "MIT"
"#,
    )?;
    std::fs::write(path.join(".gitignore"), "target/\nCargo.lock\n")?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial workspace setup"])?;

    Ok(Self { root, path })
  }

  /// Add a library crate; `deps` names other workspace crates it depends on
  pub fn add_crate(&self, name: &str, version: &str, deps: &[&str]) -> Result<PathBuf> {
    let crate_path = self.path.join("crates").join(name);
    std::fs::create_dir_all(crate_path.join("src"))?;

    let mut cargo_toml = format!(
      r#"[package]
name = "{}"
version = "{}"
edition.workspace = true
license.workspace = true
description = "Test crate {}"

[dependencies]
"#,
      name, version, name
    );
    for dep in deps {
      cargo_toml.push_str(&format!("{} = {{ path = \"../{}\", version = \"0.1.0\" }}\n", dep, dep));
    }

    std::fs::write(crate_path.join("Cargo.toml"), cargo_toml)?;
    std::fs::write(
      crate_path.join("src/lib.rs"),
      format!("//! {} crate\n\npub fn hello() -> &'static str {{\n  \"{}\"\n}}\n", name, name),
    )?;

    Ok(crate_path)
  }

  /// Write relay.toml at the workspace root
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("relay.toml"), content)?;
    Ok(())
  }

  /// Path outside the repository for command logs
  pub fn scratch(&self, name: &str) -> PathBuf {
    self.root.path().join(name)
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<()> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    Ok(())
  }

  /// Modify a file in a crate without committing
  pub fn modify_file(&self, crate_name: &str, file: &str, content: &str) -> Result<()> {
    let file_path = self.path.join("crates").join(crate_name).join(file);
    std::fs::write(file_path, content)?;
    Ok(())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run `cargo relay <args>`; the exit status is left for the test to check
pub fn run_cargo_relay(cwd: &Path, args: &[&str]) -> Result<Output> {
  let cargo_relay_bin = env!("CARGO_BIN_EXE_cargo-relay");

  Command::new(cargo_relay_bin)
    .current_dir(cwd)
    .arg("relay")
    .args(args)
    .output()
    .context("Failed to run cargo-relay")
}

/// Lines of a log file written by a fake publish command (empty if missing)
pub fn read_lines(path: &Path) -> Vec<String> {
  std::fs::read_to_string(path)
    .map(|s| s.lines().map(String::from).collect())
    .unwrap_or_default()
}
