//! Logging setup shared by the CLI and test binaries

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `level` when set. Returns false if a subscriber was
/// already installed, which happens when several tests call this.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .is_ok()
}

/// Same as [`init`] but emits JSON lines, for CI log collectors
pub fn init_json(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init("debug");
        assert!(!init("info"));
        assert!(!init_json("info"));
    }
}
