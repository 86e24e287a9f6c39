//! Integration tests for the task recipes (dry-run only; no real cargo runs)

use crate::helpers::{TestWorkspace, run_cargo_relay};
use anyhow::Result;

fn dry_run(ws: &TestWorkspace, args: &[&str]) -> Result<String> {
  let mut full = vec!["--dry-run"];
  full.extend_from_slice(args);
  let output = run_cargo_relay(&ws.path, &full)?;
  assert!(
    output.status.success(),
    "cargo relay {} failed: {}",
    full.join(" "),
    String::from_utf8_lossy(&output.stderr)
  );
  Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[test]
fn test_ci_dry_run_lists_lint_then_test() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stdout = dry_run(&ws, &["ci"])?;

  let fmt = stdout.find("would run: cargo fmt --all -- --check").expect("fmt missing");
  let clippy = stdout
    .find("would run: cargo clippy --workspace --all-targets --all-features -- -D warnings")
    .expect("clippy missing");
  let doctest = stdout.find("would run: cargo test --doc --all-features").expect("doctest missing");
  let tests = stdout
    .find("would run: cargo test --workspace --all-targets --all-features")
    .expect("tests missing");

  assert!(fmt < clippy && clippy < doctest && doctest < tests);
  Ok(())
}

#[test]
fn test_test_recipe_forwards_module_filter() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stdout = dry_run(&ws, &["test", "parser"])?;

  assert!(stdout.contains("cargo test --doc --all-features parser"));
  assert!(stdout.contains("cargo test --workspace --all-targets --all-features parser"));
  Ok(())
}

#[test]
fn test_recipes_follow_relay_toml() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config("[tasks]\nfeatures = [\"serde\"]\ntargets = \"default\"\nudeps_toolchain = \"nightly-2025-06-01\"\n")?;

  assert!(dry_run(&ws, &["lint"])?.contains("cargo clippy --workspace --features serde -- -D warnings"));
  let udeps = dry_run(&ws, &["udeps"])?;
  assert!(udeps.contains("cargo +nightly-2025-06-01 udeps --workspace --all-targets --features serde"));
  Ok(())
}

#[test]
fn test_doc_open_and_clean() -> Result<()> {
  let ws = TestWorkspace::new()?;

  assert!(dry_run(&ws, &["doc-open"])?.contains("cargo doc --workspace --all-features --no-deps --open"));
  assert!(dry_run(&ws, &["lintmut"])?.contains("cargo fmt --all"));
  assert!(dry_run(&ws, &["clean"])?.contains("would run: cargo clean"));
  Ok(())
}

#[test]
fn test_unknown_recipe_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_cargo_relay(&ws.path, &["deploy"])?;

  assert!(!output.status.success());
  Ok(())
}

#[test]
fn test_invalid_config_exits_with_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config("[publish]\ncommand = []\n")?;

  let output = run_cargo_relay(&ws.path, &["lint", "--dry-run"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("publish.command"), "stderr: {}", stderr);
  Ok(())
}
