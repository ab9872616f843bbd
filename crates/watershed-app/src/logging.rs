//! Tracing initialisation for the host binary.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,watershed_sim=info,watershed_app=info";

static TRACING_INIT: Once = Once::new();

/// Initialise tracing (idempotent; first call wins). `RUST_LOG` overrides
/// `default_filter`. Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing(default_filter: &str) {
    let default_filter = default_filter.to_owned();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&default_filter));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true)
            .compact();

        // A subscriber may already be installed, e.g. by a test harness.
        let _ = subscriber.try_init();
    });
}

/// Filter string for a `-v` count: 0 = info, 1 = debug, 2+ = trace.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => DEFAULT_FILTER,
        1 => "info,watershed_sim=debug,watershed_app=debug",
        _ => "debug,watershed_sim=trace,watershed_app=trace",
    }
}
