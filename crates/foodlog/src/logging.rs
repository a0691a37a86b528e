//! Logging setup for foodlog.
//!
//! Log lines go to stderr so they never mix with command output on stdout.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary logs, chosen with `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above, with targets.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Most detailed level shown.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    fn directive(self) -> String {
        format!("foodlog={}", self.level())
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, replaces the
/// directive derived from `verbosity`.
///
/// ```no_run
/// use foodlog::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= Verbosity::Verbose)
        .with_file(false)
        .with_line_number(false);

    // Later calls find a subscriber already installed and do nothing
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

/// Warn-level logging captured by the test harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
