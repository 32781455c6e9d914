//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise `seasoncost=info`, or
//! `seasoncost=debug` with `--verbose`. Logs go to stderr so `--json`
//! output on stdout stays machine-readable.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let default_level = if verbose {
        "seasoncost=debug"
    } else {
        "seasoncost=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Verbose logging captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
