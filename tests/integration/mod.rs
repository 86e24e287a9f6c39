//! Integration tests for cargo-relay
//!
//! Each test builds a throwaway git workspace in a temp dir and drives the
//! compiled binary against it.

mod helpers;
mod test_publish;
mod test_tasks;
