//! Logger setup.
//!
//! The browser build logs to the devtools console; native builds log to
//! stderr through env_logger. Calling [`init`] more than once only adjusts
//! the level.

/// Install the platform logger at `level`.
pub fn init(level: log::LevelFilter) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(level) = level.to_level() {
            // Fails only if a logger is already installed
            let _ = console_log::init_with_level(level);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp_millis()
            .try_init();
    }

    log::set_max_level(level);
}
