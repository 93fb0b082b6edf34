//! Structured logging setup
//!
//! Log lines go to stderr so command output on stdout stays machine-readable.
//! Filter precedence: `--verbose`/`--quiet`, then `BRANCHFLOW_LOG`, then
//! `RUST_LOG`, then `info`. Colors only when stderr is a terminal.

use std::env;
use std::io::IsTerminal;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

pub const LOG_ENV: &str = "BRANCHFLOW_LOG";

/// Level forced by `-v`/`-q`, if any
pub fn level_from_flags(verbose: u8, quiet: bool) -> Option<Level> {
  match (quiet, verbose) {
    (true, _) => Some(Level::WARN),
    (false, 0) => None,
    (false, 1) => Some(Level::DEBUG),
    (false, _) => Some(Level::TRACE),
  }
}

fn filter(level: Option<Level>) -> EnvFilter {
  if let Some(level) = level {
    return EnvFilter::new(level.as_str().to_lowercase());
  }
  let directives = env::var(LOG_ENV)
    .or_else(|_| env::var("RUST_LOG"))
    .unwrap_or_else(|_| "info".to_string());
  EnvFilter::try_new(&directives).unwrap_or_else(|e| {
    eprintln!("Invalid log filter '{}' ({}), defaulting to info", directives, e);
    EnvFilter::new("info")
  })
}

/// Install the stderr subscriber; later calls are ignored
pub fn init_logging(level: Option<Level>) {
  INIT.call_once(|| {
    tracing_subscriber::registry()
      .with(filter(level))
      .with(
        fmt::layer()
          .with_writer(std::io::stderr)
          .with_ansi(std::io::stderr().is_terminal())
          .with_target(false),
      )
      .init();
  });
}
