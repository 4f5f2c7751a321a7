//! Logging infrastructure for driverag.
//!
//! Logs go to stderr so the chat transcript on stdout stays readable.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Default filter when neither a level nor `RUST_LOG` is given.
const DEFAULT_LEVEL: &str = "info";

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "driverag_knowledge=trace")
/// * `no_color` - Disable ANSI colors
///
/// # Example
/// ```no_run
/// use driverag_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let filter_str = resolve_filter(log_level, std::env::var("RUST_LOG").ok());

    let env_filter = EnvFilter::try_new(&filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", filter_str, e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Pick the filter string: explicit level, then `RUST_LOG`, then the default.
fn resolve_filter(log_level: Option<&str>, env_level: Option<String>) -> String {
    log_level
        .map(str::to_string)
        .or(env_level)
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Color only when stderr is a terminal and `NO_COLOR` is unset.
fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_filter_precedence() {
        assert_eq!(resolve_filter(Some("debug"), Some("warn".into())), "debug");
        assert_eq!(resolve_filter(None, Some("warn".into())), "warn");
        assert_eq!(resolve_filter(None, None), "info");
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let err = init_logging(Some("driverag=loud"), true).unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("Invalid log filter 'driverag=loud'")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_init_logging_installs_once() {
        // The only test in this crate that installs a global subscriber.
        init_logging(Some("driverag_knowledge=trace,info"), true).unwrap();

        let err = init_logging(Some("info"), true).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.starts_with("Failed to init logging")));
    }
}
