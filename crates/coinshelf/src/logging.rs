//! Logging setup for the cshelf command line tool.
//!
//! Diagnostics go to stderr through `tracing` so they never mix with
//! command output on stdout. The level comes from the `-v`/`-q` flags;
//! `RUST_LOG` overrides it when set.

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level selection derived from the `-v`/`-q` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Warnings and errors; command results still print to stdout.
    #[default]
    Normal,
    /// Debug detail (`-v`).
    Verbose,
    /// Everything (`-vv` and up).
    Trace,
}

impl Verbosity {
    /// Map the number of `-v` occurrences and the `-q` flag to a
    /// verbosity. Quiet wins over any number of `-v`s.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else {
            match verbose {
                0 => Self::Normal,
                1 => Self::Verbose,
                _ => Self::Trace,
            }
        }
    }

    /// The most detailed level this verbosity lets through.
    #[must_use]
    pub fn max_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// The filter used when `RUST_LOG` is unset: this crate at the selected
/// level, dependencies at error only.
fn default_directives(verbosity: Verbosity) -> String {
    format!("error,coinshelf={}", verbosity.max_level())
}

/// Install the global tracing subscriber.
///
/// Called once at startup; repeat calls are harmless no-ops. `RUST_LOG`
/// takes precedence over the verbosity flags.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    // timestamps add noise to a short-lived CLI; targets only help at trace
    let format = fmt::layer()
        .with_writer(io::stderr)
        .without_time()
        .with_target(verbosity == Verbosity::Trace);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(2, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(7, false), Verbosity::Trace);
    }

    #[test]
    fn test_from_flags_quiet_wins() {
        assert_eq!(Verbosity::from_flags(0, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
    }

    #[test]
    fn test_max_level() {
        assert_eq!(Verbosity::Quiet.max_level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.max_level(), Level::WARN);
        assert_eq!(Verbosity::Verbose.max_level(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.max_level(), Level::TRACE);
    }

    #[test]
    fn test_default_directives_scope_dependencies_to_error() {
        assert_eq!(default_directives(Verbosity::Normal), "error,coinshelf=WARN");
        assert_eq!(default_directives(Verbosity::Trace), "error,coinshelf=TRACE");
    }

    #[test]
    fn test_init_logging_repeat_calls() {
        // only the first call installs a subscriber; the rest are ignored
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Verbose);
        init_logging(Verbosity::Trace);
    }
}
