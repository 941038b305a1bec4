//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

use crate::core::config::LoggingConfig;

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system from runtime configuration
pub fn init_from(config: &LoggingConfig) {
    env_logger::Builder::new()
        .parse_filters(&config.filter)
        .init();
}

/// Initialize logging for tests
///
/// Safe to call from multiple tests; repeated initialization is ignored.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
