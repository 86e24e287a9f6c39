//! External command execution
//!
//! Every external tool cargo-relay drives (cargo publish, fmt, clippy, doc,
//! test, udeps, clean, and listing commands) goes through [`CommandRunner`].
//! An [`Invocation`] always carries its own working directory; the process
//! working directory is never changed.

use crate::core::error::{RelayError, RelayResult};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Lines of stderr kept per invocation for hint scanning
const STDERR_TAIL: usize = 200;

/// One external command: program, arguments, working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl Invocation {
  pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.to_path_buf(),
    }
  }

  /// Build from an argv-style list such as `["cargo", "publish"]`
  pub fn from_argv(argv: &[String], cwd: &Path) -> RelayResult<Self> {
    let (program, args) = argv
      .split_first()
      .ok_or_else(|| RelayError::message("Command must name a program"))?;
    Ok(Self::new(program.clone(), cwd).args(args.iter().cloned()))
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// What an external command reported back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
  /// Exit code, `None` when terminated by a signal
  pub code: Option<i32>,
  /// Tail of captured stderr (empty when stderr was not captured)
  pub stderr: Vec<String>,
  /// Captured stdout (empty unless the runner captures stdout)
  pub stdout: String,
}

impl Outcome {
  pub fn exited(code: i32) -> Self {
    Self {
      code: Some(code),
      ..Self::default()
    }
  }

  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// Turn a non-zero exit into `RelayError::CommandFailed`
  pub fn into_result(self, invocation: &Invocation) -> RelayResult<Self> {
    if self.success() {
      Ok(self)
    } else {
      Err(RelayError::command_failed(invocation.to_string(), self.code))
    }
  }
}

/// Seam between orchestration logic and the processes it launches
pub trait CommandRunner {
  /// Run to completion. A non-zero exit is an `Ok` outcome; only failing to
  /// launch is an error.
  fn run(&mut self, invocation: &Invocation) -> RelayResult<Outcome>;
}

/// Which stream [`SystemRunner`] keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
  Nothing,
  /// Forward stderr byte for byte, keep a lossy tail
  StderrTail,
  /// Keep stdout for parsing, forward stderr
  Stdout,
}

/// Runs commands for real
///
/// Whatever is captured, the tool's stderr still reaches the user unchanged.
pub struct SystemRunner {
  capture: Capture,
}

impl SystemRunner {
  pub fn new() -> Self {
    Self {
      capture: Capture::Nothing,
    }
  }

  pub fn capturing_stderr() -> Self {
    Self {
      capture: Capture::StderrTail,
    }
  }

  pub fn capturing_stdout() -> Self {
    Self {
      capture: Capture::Stdout,
    }
  }
}

impl Default for SystemRunner {
  fn default() -> Self {
    Self::new()
  }
}

impl CommandRunner for SystemRunner {
  fn run(&mut self, invocation: &Invocation) -> RelayResult<Outcome> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args).current_dir(&invocation.cwd);

    match self.capture {
      Capture::Nothing => {
        let status = cmd.status().map_err(|e| spawn_error(invocation, e))?;
        Ok(Outcome {
          code: status.code(),
          ..Outcome::default()
        })
      }
      Capture::StderrTail => {
        cmd.stderr(Stdio::piped());
        let mut child = cmd.spawn().map_err(|e| spawn_error(invocation, e))?;

        let tail = match child.stderr.take() {
          Some(stderr) => forward_stderr(stderr),
          None => Ok(VecDeque::new()),
        };
        // Reap the child even if reading its stderr failed
        let status = child.wait()?;

        Ok(Outcome {
          code: status.code(),
          stderr: tail?.into(),
          stdout: String::new(),
        })
      }
      Capture::Stdout => {
        let output = cmd
          .stdin(Stdio::null())
          .output()
          .map_err(|e| spawn_error(invocation, e))?;
        let _ = io::stderr().write_all(&output.stderr);

        Ok(Outcome {
          code: output.status.code(),
          stderr: String::from_utf8_lossy(&output.stderr).lines().map(String::from).collect(),
          stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
      }
    }
  }
}

/// Copy a child's stderr to ours unchanged, keeping the last lines as text
fn forward_stderr(stderr: impl Read) -> io::Result<VecDeque<String>> {
  let mut reader = BufReader::new(stderr);
  let mut out = io::stderr();
  let mut tail = VecDeque::with_capacity(STDERR_TAIL);
  let mut buf = Vec::new();

  loop {
    buf.clear();
    if reader.read_until(b'\n', &mut buf)? == 0 {
      return Ok(tail);
    }

    // A closed stderr on our side must not stop the child mid-publish
    let _ = out.write_all(&buf);

    if tail.len() == STDERR_TAIL {
      tail.pop_front();
    }
    let line = String::from_utf8_lossy(&buf);
    tail.push_back(line.trim_end_matches(['\n', '\r']).to_string());
  }
}

fn spawn_error(invocation: &Invocation, err: io::Error) -> RelayError {
  RelayError::Spawn {
    program: invocation.program.clone(),
    reason: format!("Failed to execute `{}`: {}", invocation, err),
  }
}

/// Prints what would run instead of running it
#[derive(Default)]
pub struct DryRunRunner {
  pub printed: usize,
}

impl CommandRunner for DryRunRunner {
  fn run(&mut self, invocation: &Invocation) -> RelayResult<Outcome> {
    println!("   would run: {}  (in {})", invocation, invocation.cwd.display());
    self.printed += 1;
    Ok(Outcome::exited(0))
  }
}
