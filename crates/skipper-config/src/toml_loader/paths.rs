//! Default config location and first-run file creation.

use std::path::{Path, PathBuf};

use tracing::info;

use skipper_common::ConfigError;

use super::template::default_config_toml;

/// Platform default: `<config dir>/skipper/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir()
        .ok_or_else(|| ConfigError::Io("no config directory on this platform".into()))?;
    Ok(base.join("skipper").join("config.toml"))
}

/// Write the documented template to `path`, creating parent directories
/// as needed. The template parses back to pure defaults, so a freshly
/// created file changes nothing until the operator edits it.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Io(format!("creating {}: {e}", parent.display())))?;
    }

    std::fs::write(path, default_config_toml())
        .map_err(|e| ConfigError::Io(format!("writing {}: {e}", path.display())))?;

    info!("created default config at {}", path.display());
    Ok(())
}
