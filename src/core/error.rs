//! Error types for cargo-relay with contextual messages and exit codes
//!
//! Errors are categorized so `main` can pick the process exit code. Two
//! categories carry their exit code with them: a dirty working tree always
//! exits with 1, and a failed external command exits with that command's own
//! code so callers see exactly what cargo (or git) reported.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cargo-relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, dirty working tree)
  User = 1,
  /// System error (git, I/O, spawning a tool)
  System = 2,
  /// Validation failure (workspace shape, dependency cycles)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for cargo-relay
#[derive(Debug)]
pub enum RelayError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Validation errors (workspace, graph)
  Validation(ValidationError),

  /// Uncommitted changes in the working tree
  DirtyTree { changes: Vec<String> },

  /// An external tool could not be started
  Spawn { program: String, reason: String },

  /// An external command ran and exited unsuccessfully
  CommandFailed {
    command: String,
    /// Exit code, `None` when terminated by a signal
    code: Option<i32>,
    help: Option<String>,
  },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RelayError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RelayError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RelayError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// External command failure
  pub fn command_failed(command: impl Into<String>, code: Option<i32>) -> Self {
    RelayError::CommandFailed {
      command: command.into(),
      code,
      help: None,
    }
  }

  /// Attach help text to a command failure (no-op for other variants)
  pub fn with_command_help(self, text: impl Into<String>) -> Self {
    match self {
      RelayError::CommandFailed { command, code, .. } => RelayError::CommandFailed {
        command,
        code,
        help: Some(text.into()),
      },
      other => other,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RelayError::Message { message, context, help } => RelayError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      RelayError::Io(e) => RelayError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Process exit code for this error
  ///
  /// `CommandFailed` propagates the external tool's own exit code.
  pub fn exit_code(&self) -> i32 {
    match self {
      RelayError::Config(_) => ExitCode::User.as_i32(),
      RelayError::Git(_) => ExitCode::System.as_i32(),
      RelayError::Validation(_) => ExitCode::Validation.as_i32(),
      RelayError::DirtyTree { .. } => ExitCode::User.as_i32(),
      RelayError::Spawn { .. } => ExitCode::System.as_i32(),
      RelayError::CommandFailed { code, .. } => match code {
        Some(code) if *code != 0 => *code,
        _ => ExitCode::User.as_i32(),
      },
      RelayError::Io(_) => ExitCode::System.as_i32(),
      RelayError::Message { .. } => ExitCode::User.as_i32(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RelayError::Config(e) => e.help_message(),
      RelayError::Git(e) => e.help_message(),
      RelayError::Validation(e) => e.help_message(),
      RelayError::DirtyTree { .. } => {
        Some("Commit or stash your changes before publishing. Nothing was published.".to_string())
      }
      RelayError::Spawn { program, .. } => Some(format!("Is `{}` installed and on PATH?", program)),
      RelayError::CommandFailed { help, .. } => help.clone(),
      RelayError::Message { help, .. } => help.clone(),
      RelayError::Io(_) => None,
    }
  }
}

/// How many dirty paths to list before summarizing
const DIRTY_PREVIEW: usize = 10;

impl fmt::Display for RelayError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RelayError::Config(e) => write!(f, "{}", e),
      RelayError::Git(e) => write!(f, "{}", e),
      RelayError::Validation(e) => write!(f, "{}", e),
      RelayError::DirtyTree { changes } => {
        write!(f, "Working tree has {} uncommitted change(s)", changes.len())?;
        for change in changes.iter().take(DIRTY_PREVIEW) {
          write!(f, "\n  {}", change)?;
        }
        if changes.len() > DIRTY_PREVIEW {
          write!(f, "\n  ... and {} more", changes.len() - DIRTY_PREVIEW)?;
        }
        Ok(())
      }
      RelayError::Spawn { reason, .. } => write!(f, "{}", reason),
      RelayError::CommandFailed { command, code, .. } => match code {
        Some(code) => write!(f, "`{}` failed with exit code {}", command, code),
        None => write!(f, "`{}` was terminated by a signal", command),
      },
      RelayError::Io(e) => write!(f, "I/O error: {}", e),
      RelayError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RelayError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RelayError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for RelayError {
  fn from(err: io::Error) -> Self {
    RelayError::Io(err)
  }
}

impl From<String> for RelayError {
  fn from(msg: String) -> Self {
    RelayError::message(msg)
  }
}

impl From<&str> for RelayError {
  fn from(msg: &str) -> Self {
    RelayError::message(msg)
  }
}

impl From<cargo_metadata::Error> for RelayError {
  fn from(err: cargo_metadata::Error) -> Self {
    RelayError::message(format!("Cargo metadata error: {}", err))
  }
}

impl From<toml_edit::de::Error> for RelayError {
  fn from(err: toml_edit::de::Error) -> Self {
    RelayError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for RelayError {
  fn from(err: serde_json::Error) -> Self {
    RelayError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Invalid value for a field
  InvalidField { field: String, reason: String },

  /// Crate named in configuration or listing output is not a workspace member
  CrateNotFound { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidField { field, .. } => Some(format!("Fix `{}` in relay.toml.", field)),
      ConfigError::CrateNotFound { name } => Some(format!(
        "Check that '{}' is listed in [workspace] members of the root Cargo.toml.",
        name
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config value for `{}`: {}", field, reason)
      }
      ConfigError::CrateNotFound { name } => {
        write!(f, "Crate '{}' is not a member of this workspace", name)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run cargo relay from inside a git checkout (looked at {}).",
        path.display()
      )),
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Workspace dependencies form a cycle
  DependencyCycle { crate_name: String },

  /// Workspace validation failed
  WorkspaceInvalid { reason: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::DependencyCycle { .. } => {
        Some("Break the cycle (dev-dependencies do not count) before publishing.".to_string())
      }
      ValidationError::WorkspaceInvalid { .. } => None,
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::DependencyCycle { crate_name } => write!(
        f,
        "Circular dependency detected involving crate '{}'. Cannot determine publish order.",
        crate_name
      ),
      ValidationError::WorkspaceInvalid { reason } => {
        write!(f, "Workspace validation failed: {}", reason)
      }
    }
  }
}

/// Result type alias for cargo-relay
pub type RelayResult<T> = Result<T, RelayError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RelayResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RelayResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RelayError>,
{
  fn context(self, ctx: impl Into<String>) -> RelayResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RelayResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RelayError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
