//! Logger setup plus logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! A module opts in by declaring the flag and importing the macros from the crate root:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info};
//!
//! log_info!("refresh started");
//! ```

use log::LevelFilter;

const DEBUG_ENV: &str = "STEPWATCH_DEBUG";

/// Install `env_logger`. `RUST_LOG` wins when set; otherwise `STEPWATCH_DEBUG`
/// picks between `Debug` and `Info`.
pub fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none() {
        let debug_var = std::env::var(DEBUG_ENV).ok();
        builder.filter_level(default_level(debug_var.as_deref()));
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

fn default_level(debug_var: Option<&str>) -> LevelFilter {
    match debug_var {
        Some(value) if value == "1" || value.eq_ignore_ascii_case("true") => LevelFilter::Debug,
        _ => LevelFilter::Info,
    }
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
