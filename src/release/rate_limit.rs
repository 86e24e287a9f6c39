//! Pauses between publishes
//!
//! A fixed delay is the floor. When the publish tool's stderr carries a
//! registry back-off hint, the hint may lengthen the next pause, up to the
//! configured maximum.

use chrono::{DateTime, Utc};
use std::thread;
use std::time::Duration;

/// Registry back-off hint scraped from tool output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffHint {
  /// "Please try again after Tue, 21 Nov 2023 12:00:00 GMT"
  RetryAt(DateTime<Utc>),
  /// "retry after 30 seconds" / "Retry-After: 30"
  RetryAfter(Duration),
}

impl BackoffHint {
  /// Time left until the hint expires (zero if already past)
  pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
    match self {
      BackoffHint::RetryAt(at) => (*at - now).to_std().unwrap_or(Duration::ZERO),
      BackoffHint::RetryAfter(duration) => *duration,
    }
  }

  /// Last hint found in the given lines
  pub fn scan(lines: &[String]) -> Option<Self> {
    lines.iter().rev().find_map(|line| Self::parse_line(line))
  }

  fn parse_line(line: &str) -> Option<Self> {
    // ASCII lowercasing keeps byte offsets aligned with `line`
    let lower = line.to_ascii_lowercase();

    if let Some(pos) = lower.find("try again after ") {
      let rest = &line[pos + "try again after ".len()..];
      if let Some(at) = parse_rfc2822_prefix(rest) {
        return Some(BackoffHint::RetryAt(at));
      }
    }

    for marker in ["retry after ", "retry-after: ", "retry-after "] {
      if let Some(pos) = lower.find(marker) {
        let digits: String = line[pos + marker.len()..]
          .chars()
          .take_while(|c| c.is_ascii_digit())
          .collect();
        if let Ok(secs) = digits.parse::<u64>() {
          return Some(BackoffHint::RetryAfter(Duration::from_secs(secs)));
        }
      }
    }

    None
  }
}

/// Parse the longest leading run of tokens that forms an RFC 2822 date
fn parse_rfc2822_prefix(text: &str) -> Option<DateTime<Utc>> {
  let tokens: Vec<&str> = text.split_whitespace().collect();
  (4..=tokens.len().min(6)).rev().find_map(|n| {
    let candidate = tokens[..n].join(" ");
    let candidate = candidate.trim_end_matches(['.', ',', ';']);
    DateTime::parse_from_rfc2822(candidate)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
  })
}

/// Decides how long to wait before the next publish
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
  base: Duration,
  max: Duration,
}

impl RateLimiter {
  pub fn new(base: Duration, max: Duration) -> Self {
    Self {
      base,
      max: max.max(base),
    }
  }

  /// Delay after a publish whose stderr was `stderr`
  pub fn next_delay(&self, stderr: &[String], now: DateTime<Utc>) -> Duration {
    match BackoffHint::scan(stderr) {
      Some(hint) => hint.remaining(now).clamp(self.base, self.max),
      None => self.base,
    }
  }
}

/// Blocking wait between publishes
pub trait Pause {
  fn pause(&mut self, duration: Duration);
}

/// Sleeps the current thread, announcing the wait
pub struct ThreadSleep;

impl Pause for ThreadSleep {
  fn pause(&mut self, duration: Duration) {
    if duration.is_zero() {
      return;
    }
    println!("   ⏳ Waiting {}s for registry rate limits...", duration.as_secs());
    thread::sleep(duration);
  }
}

/// Never waits (dry runs)
pub struct NoPause;

impl Pause for NoPause {
  fn pause(&mut self, _duration: Duration) {}
}
