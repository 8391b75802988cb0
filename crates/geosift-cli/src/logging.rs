//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Diagnostics go to stderr so the result tables and summaries on stdout
//! stay clean. `RUST_LOG` overrides the level chosen from `--verbose`.

use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const QUIET_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,geosift=debug,geosift_cli=debug";

/// Filter directive for the given verbosity, unless `RUST_LOG` is set.
fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { QUIET_FILTER })
    })
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: bool) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }
}
