//! Release orchestration
//!
//! Publishes every workspace member to the registry, dependencies before
//! dependents, and the workspace root last.
//!
//! # Invariants
//!
//! 1. **Nothing is published from a dirty tree**
//!    - The clean check runs before discovery, so no command (not even
//!      `cargo metadata`) runs when it fails
//!
//! 2. **One invocation per unit, plus one for the root**
//!    - Strictly sequential, in discovery order
//!    - Each runs with the unit's directory as its working directory
//!
//! 3. **First failure stops the run**
//!    - The failing command's exit code becomes ours
//!    - Already published units are never rolled back
//!
//! # Example relay.toml
//!
//! ```toml
//! [publish]
//! command = ["cargo", "publish"]
//! delay_secs = 10
//! root = "auto"
//! exclude = ["xtask"]
//! ```

pub mod discovery;
pub mod orchestrator;
pub mod rate_limit;
pub mod unit;

pub use discovery::{ListingSource, MetadataSource, UnitSource};
pub use orchestrator::Orchestrator;
pub use rate_limit::{NoPause, Pause, RateLimiter, ThreadSleep};
pub use unit::{PlanReport, Workspace};
