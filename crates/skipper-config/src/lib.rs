//! Skipper configuration system.
//!
//! TOML-based settings for the launch-and-place sequence: executable
//! paths, monitor assignments, service readiness timing, browser
//! preference, and placement retry policy. All sections use
//! `serde(default)` so partial configs work out of the box. The loaded
//! config is an immutable value constructed once at startup and passed
//! by reference into the orchestrator.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::SkipperConfig;

use skipper_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Loads `config.toml` from the OS config directory, creating a
/// documented default file if none exists.
pub fn load_config() -> Result<SkipperConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &std::path::Path) -> Result<SkipperConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
