mod cargo;
mod commands;
mod core;
mod graph;
mod release;
mod tasks;

use clap::{Parser, Subcommand};
use crate::core::error::{RelayError, print_error};
use crate::tasks::Recipe;

/// Publish workspace crates in dependency order and run workspace task recipes
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Relay(RelayCli),
}

#[derive(Parser)]
#[command(name = "relay")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct RelayCli {
  /// Print the commands that would run instead of running them
  #[arg(long, global = true)]
  dry_run: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Release
  // ============================================================================
  /// Publish every workspace crate in dependency order, then the workspace root
  Publish {
    /// Stop after discovery and print the publish plan
    #[arg(long)]
    plan: bool,
    /// Output the plan in JSON format (with --plan)
    #[arg(long, requires = "plan")]
    json: bool,
    /// Seconds to wait between publishes (overrides publish.delay_secs)
    #[arg(long, value_name = "SECS")]
    delay: Option<u64>,
  },

  // ============================================================================
  // Task recipes
  // ============================================================================
  /// Run `lint`, then `test`
  Ci,

  /// Check formatting and run clippy with warnings denied
  Lint,

  /// Apply formatting and clippy fixes in place
  #[command(name = "lintmut")]
  LintMut,

  /// Run doctests, then workspace tests
  Test {
    /// Only run tests whose name contains this string
    module: Option<String>,
  },

  /// Build workspace documentation
  Doc,

  /// Build workspace documentation and open it in a browser
  #[command(name = "doc-open")]
  DocOpen,

  /// Find unused dependencies with cargo-udeps
  Udeps,

  /// Remove build artifacts
  Clean,
}

fn get_styles() -> clap::builder::Styles {
  let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
  let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
  let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .literal(anstyle::Style::new().fg_color(Some(green)))
    .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
    .error(anstyle::Style::new().bold().fg_color(Some(red)))
    .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let CargoCli::Relay(cli) = CargoCli::parse();

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(RelayError::from(e).context("Failed to get current directory")),
  };

  // Only the root path and relay.toml; cargo metadata waits until after the clean check
  let ctx = match crate::core::context::WorkspaceContext::build(&workspace_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let dry_run = cli.dry_run;
  let result = match cli.command {
    Commands::Publish { plan, json, delay } => commands::run_publish(
      &ctx,
      commands::PublishOptions {
        dry_run,
        plan,
        json,
        delay_secs: delay,
      },
    ),
    Commands::Ci => commands::run_task(&ctx, Recipe::Ci, dry_run),
    Commands::Lint => commands::run_task(&ctx, Recipe::Lint, dry_run),
    Commands::LintMut => commands::run_task(&ctx, Recipe::LintMut, dry_run),
    Commands::Test { module } => commands::run_task(&ctx, Recipe::Test { filter: module }, dry_run),
    Commands::Doc => commands::run_task(&ctx, Recipe::Doc { open: false }, dry_run),
    Commands::DocOpen => commands::run_task(&ctx, Recipe::Doc { open: true }, dry_run),
    Commands::Udeps => commands::run_task(&ctx, Recipe::Udeps, dry_run),
    Commands::Clean => commands::run_task(&ctx, Recipe::Clean, dry_run),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: RelayError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code());
}
