//! Diagnostic logging via `tracing`.
//!
//! Progress lines go to stdout through [`output`](crate::output); this
//! subscriber only carries diagnostics (stage timings, skipped files) to
//! stderr. `--verbose` forces `debug`; otherwise `RUST_LOG` applies,
//! defaulting to `warn`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter = if verbose {
        EnvFilter::new(fallback)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    // Ignore a second initialisation (e.g. from tests).
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
