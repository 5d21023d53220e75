use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "sparkle_paint=trace,sparkle_studio=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub fallback_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            fallback_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// The filter string that `init_logging` would apply, if any.
    fn resolved_filter(&self) -> Option<String> {
        let usable = |f: &String| !f.trim().is_empty();
        self.env_filter
            .clone()
            .filter(usable)
            .or_else(|| std::env::var("RUST_LOG").ok().filter(usable))
    }
}

static INIT: Once = Once::new();

/// Installs the global `env_logger` once.
///
/// Subsequent calls are ignored, as is a logger installed by the host
/// application before the first call.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.resolved_filter() {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(config.fallback_level),
        };
        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
