//! Diagnostic logging setup for the installer binary.
//!
//! The library emits diagnostics through the `log` facade. The binary routes
//! them into a `tracing-subscriber` formatter on stderr, bridged by the
//! subscriber's `tracing-log` support. Verbosity flags take precedence over
//! `RUST_LOG`.

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map command-line verbosity flags to a level filter.
///
/// `-q` shows errors only. Without flags, warnings and errors are shown;
/// `-v` adds info and debug, `-vv` and above add trace.
#[must_use]
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the event filter for the given flags and `RUST_LOG` value.
///
/// `env_directives` only applies when neither `-v` nor `-q` was given.
#[must_use]
pub fn filter_for(verbosity: u8, quiet: bool, env_directives: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(level_for(verbosity, quiet).into());
    match env_directives {
        Some(directives) if verbosity == 0 && !quiet => builder.parse_lossy(directives),
        _ => builder.parse_lossy(""),
    }
}

/// Install the global subscriber and the `log` bridge.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber or logger is already set.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<(), TryInitError> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(filter_for(verbosity, quiet, env_directives.as_deref()))
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .try_init()
}
