//! Release orchestration: clean check → discover → publish each unit → publish root
//!
//! ```text
//! START → CLEAN_CHECK → { ABORT | DISCOVER } → PUBLISH_LOOP(0..n) → PUBLISH_ROOT → DONE
//! ```
//!
//! No phase is entered twice and nothing is retried. Any failing external
//! command ends the run with that command's exit code; units already
//! published stay published.

use crate::core::error::{RelayError, RelayResult};
use crate::core::executor::{CommandRunner, Invocation};
use crate::core::vcs::WorkingTree;
use crate::release::discovery::UnitSource;
use crate::release::rate_limit::{BackoffHint, Pause, RateLimiter};
use crate::release::unit::{PublishableUnit, Workspace};
use chrono::Utc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Start,
  CleanCheck,
  Aborted,
  Discover,
  PublishLoop(usize),
  PublishRoot,
  Done,
  Failed,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct PublishReport {
  pub plan_id: String,
  pub published: Vec<String>,
  pub root_published: bool,
}

pub struct Orchestrator<'a> {
  tree: &'a dyn WorkingTree,
  source: &'a mut dyn UnitSource,
  runner: &'a mut dyn CommandRunner,
  pause: &'a mut dyn Pause,
  limiter: RateLimiter,
  publish_command: Vec<String>,
  phases: Vec<Phase>,
  pending_delay: Option<Duration>,
}

impl<'a> Orchestrator<'a> {
  pub fn new(
    tree: &'a dyn WorkingTree,
    source: &'a mut dyn UnitSource,
    runner: &'a mut dyn CommandRunner,
    pause: &'a mut dyn Pause,
    limiter: RateLimiter,
    publish_command: Vec<String>,
  ) -> Self {
    Self {
      tree,
      source,
      runner,
      pause,
      limiter,
      publish_command,
      phases: Vec::new(),
      pending_delay: None,
    }
  }

  /// Phases visited so far, in order
  pub fn phases(&self) -> &[Phase] {
    &self.phases
  }

  /// Fail if the working tree has uncommitted changes
  pub fn check_clean(&mut self) -> RelayResult<()> {
    self.enter(Phase::Start);
    self.enter(Phase::CleanCheck);

    let changes = self.tree.uncommitted_changes()?;
    if !changes.is_empty() {
      self.enter(Phase::Aborted);
      return Err(RelayError::DirtyTree { changes });
    }
    Ok(())
  }

  /// Clean check plus discovery, without publishing anything
  pub fn plan(&mut self) -> RelayResult<Workspace> {
    self.check_clean()?;
    self.enter(Phase::Discover);
    self.source.discover().inspect_err(|_| self.phases.push(Phase::Failed))
  }

  /// Full run
  pub fn run(&mut self) -> RelayResult<PublishReport> {
    let workspace = self.plan()?;
    let total = workspace.publish_count();

    if total == 0 {
      println!("ℹ️  No publishable crates found");
      self.enter(Phase::Done);
      return Ok(PublishReport {
        plan_id: workspace.plan_id(),
        published: Vec::new(),
        root_published: false,
      });
    }

    println!("📦 Publishing {} crate(s) in dependency order", total);
    println!("   Order: {}", order_line(&workspace));
    println!();

    let mut published = Vec::with_capacity(workspace.units.len());
    for (idx, unit) in workspace.units.iter().enumerate() {
      self.enter(Phase::PublishLoop(idx));
      self.publish(unit, idx + 1, total)?;
      published.push(unit.name.clone());
    }

    let mut root_published = false;
    if let Some(root) = &workspace.root_unit {
      self.enter(Phase::PublishRoot);
      self.publish(root, total, total)?;
      root_published = true;
    }

    self.enter(Phase::Done);
    Ok(PublishReport {
      plan_id: workspace.plan_id(),
      published,
      root_published,
    })
  }

  fn publish(&mut self, unit: &PublishableUnit, position: usize, total: usize) -> RelayResult<()> {
    if let Some(delay) = self.pending_delay.take() {
      self.pause.pause(delay);
    }

    println!("📌 [{}/{}] {}", position, total, unit);

    let invocation = Invocation::from_argv(&self.publish_command, &unit.dir)?;
    let outcome = self
      .runner
      .run(&invocation)
      .inspect_err(|_| self.phases.push(Phase::Failed))?;

    if !outcome.success() {
      self.enter(Phase::Failed);
      let err = RelayError::command_failed(invocation.to_string(), outcome.code);
      let err = match BackoffHint::scan(&outcome.stderr) {
        Some(hint) => err.with_command_help(format!(
          "The registry asked to wait {}s before retrying. Crates before '{}' are already published; \
           re-run once the limit resets.",
          hint.remaining(Utc::now()).as_secs(),
          unit.name
        )),
        None => err.with_command_help(format!(
          "Crates before '{}' are already published. Fix the problem and re-run; publishing is not rolled back.",
          unit.name
        )),
      };
      return Err(err);
    }

    println!("   ✅ Published {}", unit);
    self.pending_delay = Some(self.limiter.next_delay(&outcome.stderr, Utc::now()));
    Ok(())
  }

  fn enter(&mut self, phase: Phase) {
    self.phases.push(phase);
  }
}

fn order_line(workspace: &Workspace) -> String {
  workspace
    .units
    .iter()
    .chain(workspace.root_unit.iter())
    .map(|u| u.name.as_str())
    .collect::<Vec<_>>()
    .join(" → ")
}
