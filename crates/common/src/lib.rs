//! Peex QA Common Library
//!
//! Shared configuration, error types and logging setup for the Peex UI
//! test automation crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod memento;

// Re-export commonly used types
pub use config::{
    DeviceLabConfig, DeviceProfile, EnvironmentData, IndexingConfig, TestConfig, WebDriverConfig,
};
pub use error::{Error, Result};

/// Toolkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "peex.toml";
