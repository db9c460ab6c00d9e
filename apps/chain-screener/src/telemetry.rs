//! Tracing subscriber setup.
//!
//! The configured `logging.level` is the default filter; a non-empty
//! `RUST_LOG` replaces it. `logging.format` selects human-readable or
//! one-JSON-object-per-line output, both on stderr so that stdout carries
//! only the ranked results.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chain_screener::telemetry::init_tracing;
//!
//! let config = load_config(None)?;
//! init_tracing(&config.logging)?;
//! ```

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filter = EnvFilter::new(filter_directives(config, rust_log.as_deref()));

    let json_layer = config.is_json().then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
    });

    let pretty_layer = (!config.is_json()).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(if config.include_spans {
                FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            })
    });

    Registry::default()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
}

/// Filter directives: `RUST_LOG` when set and non-empty, else the configured level.
fn filter_directives(config: &LoggingConfig, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => config.level.trim().to_lowercase(),
    }
}
