//! # Telemetry
//!
//! Tracing setup for hosts embedding the terminal session.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages from every crate
//! - `RUST_LOG=tillpoint_core=trace` - Cart engine only
//! - Default: INFO, DEBUG for the tillpoint crates

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,tillpoint_core=debug,tillpoint_session=debug";

/// Installs the global fmt subscriber.
///
/// Returns false if a subscriber was already installed (for example by the
/// host application or an earlier call); the existing one stays in place.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
