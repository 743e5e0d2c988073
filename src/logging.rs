//! Logger setup for the si4703-rs library and CLI.
//!
//! The library only emits records through the `log` macros; installing a
//! backend is left to the application.

use log::{info, log_enabled, Level};

/// Default filter used by the CLI when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "si4703_rs=info";

/// Install `env_logger`, configured from `RUST_LOG` (e.g. `RUST_LOG=si4703_rs=debug`)
/// and falling back to `filter` when it is unset.
pub fn init_logger_with_default(filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

/// Log a status line at info level.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}
