//! Logger setup for the command line front end

use log::LevelFilter;

/// Environment variable that forces debug-level output
pub const DEBUG_ENV_VAR: &str = "GLSL2CG_DEBUG";

/// Initialize logging for the translator
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging(verbose: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let log_level = if verbose || std::env::var(DEBUG_ENV_VAR).is_ok() {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_target(false)
            .init();
    });
}
