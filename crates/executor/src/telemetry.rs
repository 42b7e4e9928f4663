use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Installs the global tracing subscriber.
///
/// Reads the `FRAUD_RINGS_LOG` environment variable for filter directives,
/// e.g. `FRAUD_RINGS_LOG=fraud_ring_core=debug,executor=info`, falling back
/// to `info`. Logs go to stderr so the report on stdout stays clean.
/// Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("FRAUD_RINGS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .with(filter)
            .init();
    });
}
