//! `cargo relay <recipe>` - Run a task recipe at the workspace root
//!
//! `ci`, `lint`, `lintmut`, `test`, `doc`, `doc-open`, `udeps` and `clean`
//! all come through here. `--dry-run` shows the invocations without running
//! them.

use crate::core::context::WorkspaceContext;
use crate::core::error::RelayResult;
use crate::core::executor::{DryRunRunner, SystemRunner};
use crate::tasks::{Recipe, run_recipe};

/// Run a task recipe
pub fn run_task(ctx: &WorkspaceContext, recipe: Recipe, dry_run: bool) -> RelayResult<()> {
  println!("🎯 Running `{}` for workspace {}", recipe, ctx.workspace_root().display());

  if dry_run {
    println!("DRY RUN: Would execute:");
    let mut runner = DryRunRunner::default();
    run_recipe(&recipe, &ctx.config.tasks, ctx.workspace_root(), &mut runner)?;
    return Ok(());
  }

  let mut runner = SystemRunner::new();
  let ran = run_recipe(&recipe, &ctx.config.tasks, ctx.workspace_root(), &mut runner)?;

  println!("✅ `{}` completed ({} step(s))", recipe, ran);
  Ok(())
}
