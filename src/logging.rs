//! Logging setup
//!
//! The engine only emits `tracing` events; installing a subscriber is up to the
//! host application. These helpers cover the common cases.

use crate::error::AnalyticsError;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Install a formatted stderr subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` (e.g. `"usage_analytics=debug"`).
/// Fails if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), AnalyticsError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| AnalyticsError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| AnalyticsError::Logging(e.to_string()))
}

/// Initialize logging for tests (captured by the test harness)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_bad_filter() {
        // Only reached when RUST_LOG is unset; a set RUST_LOG would win
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(
                init("usage_analytics=loud"),
                Err(AnalyticsError::Logging(_))
            ));
        }
    }

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::info!("logging initialized twice without panicking");
    }
}
