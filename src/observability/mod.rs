//! Logging setup
//!
//! Events go through `tracing`; this module installs the `fmt` subscriber.
//! `RUST_LOG` wins over the configured filter.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "info,tourneydb=debug";

/// Resolves the active filter: `RUST_LOG` first, then `configured`.
///
/// An unparsable `configured` directive falls back to [`DEFAULT_LOG_FILTER`].
pub fn resolve_filter(configured: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber.
///
/// Returns false if one was already installed.
pub fn init_logging(configured: &str) -> bool {
    fmt()
        .with_env_filter(resolve_filter(configured))
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init_logging(DEFAULT_LOG_FILTER);
        assert!(!init_logging(DEFAULT_LOG_FILTER));
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
