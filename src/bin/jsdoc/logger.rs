//! Logging setup for the jsdoc CLI.
//!
//! Library code logs through `tracing`; only the binary installs a
//! subscriber. Output goes to stderr so it never mixes with parse results.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Level selection, first match wins:
/// 1. `--verbose`: debug for the jsdoc crate
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. warnings
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("jsdoc=debug")
    } else if quiet {
        EnvFilter::new("jsdoc=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jsdoc=warn"))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
