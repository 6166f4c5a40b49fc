//! Logging initialization

/// Initialize the logging system with an explicit default filter.
///
/// `RUST_LOG` still takes precedence when it is set.
///
/// # Example
/// ```
/// outliner::core::logging::init_with_filter("debug");
/// log::info!("Outliner started");
/// ```
pub fn init_with_filter(default_filter: &str) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter)
    ).try_init();
}

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
pub fn init() {
    init_with_filter("info");
}
