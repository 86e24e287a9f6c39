pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::RelayResult;

/// Version-control status query used to gate a release
pub trait WorkingTree {
  /// Human-readable list of uncommitted changes; empty means clean
  fn uncommitted_changes(&self) -> RelayResult<Vec<String>>;
}
