//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use aspen_core::config::WebsiteConfig;
use aspen_core::config::logging::{LogFormat, threshold_directive};

/// Builds the level filter: `RUST_LOG` wins, otherwise `filter_directives`.
pub fn env_filter(config: &WebsiteConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(config)))
}

/// Directives for `logging_threshold`, narrowed to `log_filter` when set.
pub fn filter_directives(config: &WebsiteConfig) -> String {
    let level = threshold_directive(config.logging_threshold);
    match config.log_filter.trim() {
        "" => level.to_string(),
        target => format!("off,{target}={level}"),
    }
}

/// Installs the global subscriber. Call once, before building the website.
pub fn init_logging(config: &WebsiteConfig) {
    let filter = env_filter(config);

    match config.log_format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Verbose => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .init();
        }
        LogFormat::Compact => {
            fmt()
                .compact()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
