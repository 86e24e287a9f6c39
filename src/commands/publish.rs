//! `cargo relay publish` - Publish every workspace crate in dependency order
//!
//! Supports:
//! - `--dry-run` to print each publish invocation instead of running it
//! - `--plan` to stop after discovery and print the publish order
//! - `--json` (with `--plan`) for machine-readable output
//! - `--delay <secs>` to override `publish.delay_secs`

use crate::core::config::DiscoverySource;
use crate::core::context::WorkspaceContext;
use crate::core::error::RelayResult;
use crate::core::executor::{CommandRunner, DryRunRunner, SystemRunner};
use crate::core::vcs::SystemGit;
use crate::release::{
  ListingSource, MetadataSource, NoPause, Orchestrator, Pause, PlanReport, RateLimiter, ThreadSleep, UnitSource,
  Workspace,
};
use std::time::Duration;

/// Options for the publish command
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
  pub dry_run: bool,
  pub plan: bool,
  pub json: bool,
  pub delay_secs: Option<u64>,
}

/// Run the publish command
pub fn run_publish(ctx: &WorkspaceContext, options: PublishOptions) -> RelayResult<()> {
  let publish = &ctx.config.publish;
  let git = SystemGit::open(ctx.workspace_root())?;

  let mut source: Box<dyn UnitSource> = match publish.discovery {
    DiscoverySource::Metadata => Box::new(MetadataSource::new(ctx.workspace_root(), publish)),
    DiscoverySource::Listing => Box::new(ListingSource::new(
      ctx.workspace_root(),
      publish,
      Box::new(SystemRunner::capturing_stdout()),
    )),
  };

  let (mut runner, mut pause): (Box<dyn CommandRunner>, Box<dyn Pause>) = if options.dry_run || options.plan {
    (Box::new(DryRunRunner::default()), Box::new(NoPause))
  } else {
    (Box::new(SystemRunner::capturing_stderr()), Box::new(ThreadSleep))
  };

  let delay = options.delay_secs.map(Duration::from_secs).unwrap_or_else(|| publish.delay());
  let limiter = RateLimiter::new(delay, publish.max_delay());

  let mut orchestrator = Orchestrator::new(
    &git,
    source.as_mut(),
    runner.as_mut(),
    pause.as_mut(),
    limiter,
    publish.command.clone(),
  );

  if options.plan {
    let workspace = orchestrator.plan()?;
    if options.json {
      println!("{}", serde_json::to_string_pretty(&PlanReport::new(&workspace))?);
    } else {
      print_plan(&workspace);
    }
    return Ok(());
  }

  if options.dry_run {
    println!("🔍 Dry-run mode (nothing will be published)");
    println!();
  }

  let report = orchestrator.run()?;

  println!();
  if options.dry_run {
    let invocations = report.published.len() + usize::from(report.root_published);
    let trail: Vec<String> = orchestrator.phases().iter().map(|p| format!("{:?}", p)).collect();
    println!("✅ Dry run complete: {} publish invocation(s)", invocations);
    println!("   Phases: {}", trail.join(" → "));
  } else {
    println!(
      "✅ Published {} crate(s){}",
      report.published.len(),
      if report.root_published { " and the workspace root" } else { "" }
    );
  }
  println!("   Plan: {}", report.plan_id);
  Ok(())
}

/// Human-readable publish plan
fn print_plan(workspace: &Workspace) {
  println!("📦 Publish Plan ({})", workspace.plan_id());
  println!("════════════════════════════════════════");
  println!();

  if workspace.publish_count() == 0 {
    println!("ℹ️  No publishable crates found");
    return;
  }

  for (idx, unit) in workspace.units.iter().enumerate() {
    println!("  {:>2}. {}", idx + 1, unit);
    if !unit.depends_on.is_empty() {
      println!("      after: {}", unit.depends_on.join(", "));
    }
  }

  match &workspace.root_unit {
    Some(root) => println!("  {:>2}. {}  [workspace root]", workspace.units.len() + 1, root),
    None => println!("\n  Workspace root is not published"),
  }

  println!();
  println!("Total: {} publish invocation(s)", workspace.publish_count());
}
