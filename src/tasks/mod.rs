//! Task recipes: thin, ordered aliases over cargo tooling
//!
//! Recipes never interpret tool output. They run each invocation to
//! completion, stop at the first failure, and hand back its exit code.

pub mod recipe;

pub use recipe::Recipe;

use crate::core::config::TaskConfig;
use crate::core::error::RelayResult;
use crate::core::executor::CommandRunner;
use std::path::Path;

/// Run a recipe's invocations in order, stopping at the first failure
///
/// Returns the number of invocations that ran successfully.
pub fn run_recipe(
  recipe: &Recipe,
  config: &TaskConfig,
  root: &Path,
  runner: &mut dyn CommandRunner,
) -> RelayResult<usize> {
  let invocations = recipe.invocations(config, root);
  let total = invocations.len();

  for (idx, invocation) in invocations.iter().enumerate() {
    println!("▶️  [{}/{}] {}", idx + 1, total, invocation);
    runner.run(invocation)?.into_result(invocation)?;
  }

  Ok(total)
}
