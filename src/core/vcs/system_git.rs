//! System git backend
//!
//! Shells out to the `git` binary with an isolated environment. cargo-relay
//! only needs read-only queries, so this stays small.

use super::WorkingTree;
use crate::core::error::{GitError, RelayError, RelayResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// Fails early with `RepoNotFound` when `path` is outside any repository.
  pub fn open(path: &Path) -> RelayResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(RelayError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(RelayError::message(format!("Failed to open git repository: {}", stderr)));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// `git status --porcelain` entries (staged, unstaged, and untracked)
  pub fn status_porcelain(&self) -> RelayResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["status", "--porcelain=v1", "--untracked-files=normal"])
      .output()
      .context("Failed to run git status")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(RelayError::Git(GitError::CommandFailed {
        command: "git status --porcelain".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(parse_porcelain(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

impl WorkingTree for SystemGit {
  fn uncommitted_changes(&self) -> RelayResult<Vec<String>> {
    self.status_porcelain()
  }
}

fn parse_porcelain(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .filter(|line| !line.trim().is_empty())
    .map(|line| line.to_string())
    .collect()
}
