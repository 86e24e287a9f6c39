//! Integration tests for `cargo relay publish`
//!
//! A shell stand-in replaces `cargo publish` and appends the directory it ran
//! in to a log outside the repository.

use crate::helpers::{TestWorkspace, read_lines, run_cargo_relay};
use anyhow::Result;
use std::path::Path;

/// Logs its directory name; exits 2 in the directory named by `fail_in`
fn fake_publish_config(log: &Path, fail_in: Option<&str>, root: &str) -> String {
  let fail = fail_in
    .map(|dir| format!("; [ \"$d\" != {} ] || exit 2", dir))
    .unwrap_or_default();
  format!(
    r#"[publish]
command = ["sh", "-c", 'd=$(basename "$(pwd -P)"); echo "$d" >> "$1"{}', "sh", '{}']
delay_secs = 0
root = "{}"
"#,
    fail,
    log.display(),
    root
  )
}

/// a <- b <- c, committed
fn chain_workspace() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("a", "0.1.0", &[])?;
  ws.add_crate("b", "0.1.0", &["a"])?;
  ws.add_crate("c", "0.1.0", &["b"])?;
  ws.commit("Add crates")?;
  Ok(ws)
}

#[cfg(unix)]
#[test]
fn test_publish_in_dependency_order_then_root() -> Result<()> {
  let ws = chain_workspace()?;
  let log = ws.scratch("publish.log");
  ws.write_config(&fake_publish_config(&log, None, "always"))?;
  ws.commit("Add relay.toml")?;

  let output = run_cargo_relay(&ws.path, &["publish"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(
    output.status.success(),
    "publish failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  assert_eq!(read_lines(&log), vec!["a", "b", "c", "ws"]);
  assert!(stdout.contains("[1/4] a (0.1.0)"));
  assert!(stdout.contains("[4/4] ws"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_virtual_workspace_skips_root_by_default() -> Result<()> {
  let ws = chain_workspace()?;
  let log = ws.scratch("publish.log");
  ws.write_config(&fake_publish_config(&log, None, "auto"))?;
  ws.commit("Add relay.toml")?;

  let output = run_cargo_relay(&ws.path, &["publish"])?;

  assert!(output.status.success());
  assert_eq!(read_lines(&log), vec!["a", "b", "c"]);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_failed_publish_stops_and_propagates_exit_code() -> Result<()> {
  let ws = chain_workspace()?;
  let log = ws.scratch("publish.log");
  ws.write_config(&fake_publish_config(&log, Some("b"), "always"))?;
  ws.commit("Add relay.toml")?;

  let output = run_cargo_relay(&ws.path, &["publish"])?;

  assert_eq!(output.status.code(), Some(2));
  assert_eq!(read_lines(&log), vec!["a", "b"]);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_dirty_tree_publishes_nothing() -> Result<()> {
  let ws = chain_workspace()?;
  let log = ws.scratch("publish.log");
  ws.write_config(&fake_publish_config(&log, None, "always"))?;
  ws.commit("Add relay.toml")?;

  ws.modify_file("a", "src/lib.rs", "pub fn changed() {}\n")?;

  let output = run_cargo_relay(&ws.path, &["publish"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(read_lines(&log).is_empty());
  assert!(stderr.contains("uncommitted"), "stderr: {}", stderr);
  assert!(stderr.contains("crates/a/src/lib.rs"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_untracked_file_counts_as_dirty() -> Result<()> {
  let ws = chain_workspace()?;
  let log = ws.scratch("publish.log");
  ws.write_config(&fake_publish_config(&log, None, "always"))?;
  ws.commit("Add relay.toml")?;

  std::fs::write(ws.path.join("notes.txt"), "scratch")?;

  let output = run_cargo_relay(&ws.path, &["publish"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(read_lines(&log).is_empty());

  Ok(())
}

#[test]
fn test_plan_json_lists_order() -> Result<()> {
  let ws = chain_workspace()?;
  ws.write_config("[publish]\nroot = \"never\"\nexclude = [\"c\"]\n")?;
  ws.commit("Add relay.toml")?;

  let output = run_cargo_relay(&ws.path, &["publish", "--plan", "--json"])?;
  assert!(output.status.success());

  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let names: Vec<&str> = plan["units"]
    .as_array()
    .map(|units| units.iter().filter_map(|u| u["name"].as_str()).collect())
    .unwrap_or_default();

  assert_eq!(names, vec!["a", "b"]);
  assert_eq!(plan["publish_count"], 2);
  assert!(plan["root_unit"].is_null());
  assert_eq!(plan["units"][1]["depends_on"][0], "a");

  Ok(())
}

#[test]
fn test_dry_run_prints_publish_invocations() -> Result<()> {
  let ws = chain_workspace()?;

  let output = run_cargo_relay(&ws.path, &["publish", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(output.status.success());
  assert_eq!(stdout.matches("would run: cargo publish").count(), 3);
  assert!(!stdout.contains("Waiting"));

  Ok(())
}

#[test]
fn test_publish_outside_git_repo_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("Cargo.toml"), "[workspace]\nmembers = []\n")?;

  let output = run_cargo_relay(dir.path(), &["publish"])?;

  assert_eq!(output.status.code(), Some(2));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_listing_discovery_keeps_listed_order_and_drops_header() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("a", "0.1.0", &[])?;
  ws.add_crate("b", "0.1.0", &[])?;
  let log = ws.scratch("publish.log");
  let mut config = fake_publish_config(&log, None, "auto");
  config.push_str("discovery = \"listing\"\nlisting_command = [\"sh\", \"-c\", 'printf \"name\\nb\\na\\n\"']\n");
  ws.write_config(&config)?;
  ws.commit("Add crates and relay.toml")?;

  let output = run_cargo_relay(&ws.path, &["publish"])?;

  assert!(
    output.status.success(),
    "publish failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  assert_eq!(read_lines(&log), vec!["b", "a"]);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_failing_listing_command_publishes_nothing() -> Result<()> {
  let ws = chain_workspace()?;
  let log = ws.scratch("publish.log");
  let mut config = fake_publish_config(&log, None, "always");
  config.push_str("discovery = \"listing\"\nlisting_command = [\"sh\", \"-c\", \"exit 5\"]\n");
  ws.write_config(&config)?;
  ws.commit("Add relay.toml")?;

  let output = run_cargo_relay(&ws.path, &["publish"])?;

  assert_eq!(output.status.code(), Some(5));
  assert!(read_lines(&log).is_empty());

  Ok(())
}
