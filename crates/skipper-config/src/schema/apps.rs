//! Launched application configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One externally launched application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppLaunchConfig {
    /// Executable path. Must be set; there is no usable default.
    pub path: PathBuf,
    pub args: Vec<String>,
    /// Monitor index this application's window should be placed on.
    /// `None` leaves the window wherever the application puts it.
    pub monitor: Option<usize>,
}

impl AppLaunchConfig {
    pub fn is_configured(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }
}

/// The two supervised applications. The primary is launched first; the
/// secondary is the one expected to expose the TCP service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppsConfig {
    pub primary: AppLaunchConfig,
    pub secondary: AppLaunchConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_app_is_unconfigured() {
        let app = AppLaunchConfig::default();
        assert!(!app.is_configured());
        assert!(app.args.is_empty());
        assert_eq!(app.monitor, None);
    }

    #[test]
    fn partial_toml() {
        let apps: AppsConfig = toml::from_str(
            r#"
[primary]
path = "/opt/station/remote_ctrl"
args = ["--theme", "dark"]
monitor = 1
"#,
        )
        .unwrap();
        assert!(apps.primary.is_configured());
        assert_eq!(apps.primary.args, vec!["--theme", "dark"]);
        assert_eq!(apps.primary.monitor, Some(1));
        assert!(!apps.secondary.is_configured());
    }
}
