use env_logger::Env;
use log::LevelFilter;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info";

/// Install the process-wide logger. `RUST_LOG` overrides the default
/// `info` level; calling this twice is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .try_init();
}

/// Logger for tests: captured output, everything from this crate
pub fn init_test_logging() {
    let _ = env_logger::Builder::new()
        .filter_module("invoice_dashboard", LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
