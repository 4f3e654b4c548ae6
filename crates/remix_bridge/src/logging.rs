//! Logging setup

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system at `info`, overridable through `RUST_LOG`
pub fn init() {
    init_with_filter(log::LevelFilter::Info);
}

/// Initialize the logging system with a default level
///
/// `RUST_LOG` still takes precedence. Calling this more than once is harmless;
/// later calls are ignored.
pub fn init_with_filter(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
