//! Diagnostic logging setup
//!
//! Events go to stderr so they never mix with interface or token output on
//! stdout.

use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level implied by the number of `-v` flags
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Explicit `-v` flags win; otherwise `RUST_LOG` is honoured, falling back to
/// warnings only.
pub fn init(verbosity: u8) {
    let filter = if verbosity > 0 {
        EnvFilter::new(level_for(verbosity))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(0)))
    };

    let stderr_layer = fmt::layer()
        .compact()
        .with_target(verbosity > 2)
        .without_time()
        .with_writer(io::stderr);

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
