//! Viewer (browser) configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Browser families the launcher knows argument templates for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Edge,
    Chrome,
    Chromium,
    Firefox,
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserKind::Edge => "edge",
            BrowserKind::Chrome => "chrome",
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
        };
        f.write_str(name)
    }
}

/// How to launch and place the browser that views the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Preferred browsers in order. Empty means try the built-in
    /// preference order, falling back to the system default handler.
    pub browsers: Vec<BrowserKind>,
    /// Monitor index the viewer window should be placed on.
    pub monitor: Option<usize>,
    /// Launch in app mode (no UI chrome) where the browser supports it.
    pub app_mode: bool,
    /// Dedicated profile directory so kiosk state never touches the
    /// user's regular browser profile. `None` derives one next to the
    /// config file.
    pub profile_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            browsers: Vec::new(),
            monitor: None,
            app_mode: true,
            profile_dir: None,
        }
    }
}
