//! Logging setup for sift.
//!
//! Composition logs through `tracing`: applied fragments at `debug`,
//! degraded filters at `debug` with a `reason` field, rendered fragments at
//! `trace`. Applications that already install a subscriber need nothing
//! from this module. Otherwise, with the `tracing-subscriber` feature
//! enabled, [`init`] installs one configured from the environment:
//!
//! - `SIFT_DEBUG=true|1|yes` - enable debug logging
//! - `SIFT_LOG_LEVEL=trace|debug|info|warn|error` - set the level explicitly
//! - `SIFT_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! ```rust,no_run
//! use sift_query::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    /// Parse a format name, falling back to JSON.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Whether logging was requested at all.
    pub enabled: bool,
    /// The level directive for sift crates.
    pub level: &'static str,
    /// The output format.
    pub format: LogFormat,
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_level(value: Option<&str>, debug: bool) -> &'static str {
    let fallback = if debug { "debug" } else { "warn" };
    match value.map(str::to_lowercase).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") => "error",
        _ => fallback,
    }
}

impl LogSettings {
    /// Resolve settings from raw variable values.
    pub fn resolve(debug: Option<&str>, level: Option<&str>, format: Option<&str>) -> Self {
        let debug = debug.is_some_and(is_truthy);
        Self {
            enabled: debug || level.is_some(),
            level: parse_level(level, debug),
            format: format.map(LogFormat::parse).unwrap_or_default(),
        }
    }

    /// Resolve settings from `SIFT_DEBUG`, `SIFT_LOG_LEVEL` and `SIFT_LOG_FORMAT`.
    pub fn from_env() -> Self {
        let debug = env::var("SIFT_DEBUG").ok();
        let level = env::var("SIFT_LOG_LEVEL").ok();
        let format = env::var("SIFT_LOG_FORMAT").ok();
        Self::resolve(debug.as_deref(), level.as_deref(), format.as_deref())
    }

    /// The `EnvFilter` directive covering the sift crates.
    pub fn directive(&self) -> String {
        format!(
            "sift={level},sift_query={level},sift_mongodb={level}",
            level = self.level
        )
    }
}

/// Initialize logging from the environment. Subsequent calls are no-ops.
pub fn init() {
    init_with(LogSettings::from_env());
}

/// Initialize logging with explicit settings. Subsequent calls are no-ops.
pub fn init_with(settings: LogSettings) {
    INIT.call_once(|| {
        if !settings.enabled {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(settings.directive())
                .unwrap_or_else(|_| EnvFilter::new("warn"));
            let registry = tracing_subscriber::registry().with(filter);

            let installed = match settings.format {
                LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
                LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
                LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = settings.level,
                    format = ?settings.format,
                    "sift logging initialized"
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_disabled_by_default() {
        let settings = LogSettings::resolve(None, None, None);
        assert!(!settings.enabled);
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.format, LogFormat::Json);
    }

    #[test]
    fn test_resolve_debug_flag() {
        let settings = LogSettings::resolve(Some("YES"), None, Some("compact"));
        assert!(settings.enabled);
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.format, LogFormat::Compact);
    }

    #[test]
    fn test_resolve_explicit_level() {
        let settings = LogSettings::resolve(Some("0"), Some("TRACE"), Some("pretty"));
        assert!(settings.enabled);
        assert_eq!(settings.level, "trace");
        assert_eq!(settings.format, LogFormat::Pretty);

        let settings = LogSettings::resolve(None, Some("loud"), None);
        assert_eq!(settings.level, "warn");
    }

    #[test]
    fn test_directive() {
        let settings = LogSettings::resolve(Some("1"), None, None);
        assert_eq!(
            settings.directive(),
            "sift=debug,sift_query=debug,sift_mongodb=debug"
        );
    }
}
