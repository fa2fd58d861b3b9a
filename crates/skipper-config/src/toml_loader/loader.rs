//! Core TOML config loading.

use crate::schema::SkipperConfig;
use skipper_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation is the caller's concern (see [`crate::load_config_from`]);
/// this function only reads and parses.
pub fn load_from_path(path: &Path) -> Result<SkipperConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::Io(format!(
                "reading {}: {e}",
                path.display()
            )));
        }
    };

    let config: SkipperConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/skipper/config.toml`
/// On Linux: `~/.config/skipper/config.toml`
///
/// If the file does not exist, a documented default config file is
/// created and the defaults are returned (which then fail validation
/// until the operator fills in the executable paths).
pub fn load_default() -> Result<SkipperConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(SkipperConfig::default())
        }
        Err(e) => Err(e),
    }
}
