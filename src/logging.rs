//! Tracing setup for the command line
//!
//! `RUST_LOG` takes precedence. Otherwise only warnings from this crate are
//! shown, or its progress messages too with `--verbose`. Output goes to
//! stderr so command output on stdout stays clean.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` isn't set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "logkeep=info"
    } else {
        "logkeep=warn"
    }
}

/// Install the global subscriber
///
/// Installing twice is harmless; the second attempt is reported and skipped.
pub fn init_tracing(verbose: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    if let Err(err) = init_result {
        tracing::warn!(error = %err, "tracing already initialized; skipping setup");
    }
}
