//! Browser resolution and launch argument templates.
//!
//! The viewer is whichever configured browser actually resolves on this
//! machine: `which` lookup on the usual executable names first, then
//! the well-known install locations. The argument templates are fixed
//! per browser family; app mode is preferred because it drops the UI
//! chrome, with a plain fullscreen launch as the second shape. The
//! system default URL handler is the last resort when nothing resolves.

use std::path::{Path, PathBuf};

use tracing::debug;

use skipper_config::schema::BrowserKind;

/// Built-in preference order used when the config lists no browsers.
pub const DEFAULT_PREFERENCE: &[BrowserKind] = &[
    BrowserKind::Edge,
    BrowserKind::Chrome,
    BrowserKind::Chromium,
    BrowserKind::Firefox,
];

/// A browser executable that exists on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBrowser {
    pub kind: BrowserKind,
    pub path: PathBuf,
}

fn executable_names(kind: BrowserKind) -> &'static [&'static str] {
    match kind {
        BrowserKind::Edge => &["msedge", "microsoft-edge"],
        BrowserKind::Chrome => &["google-chrome", "chrome", "google-chrome-stable"],
        BrowserKind::Chromium => &["chromium", "chromium-browser"],
        BrowserKind::Firefox => &["firefox"],
    }
}

fn well_known_paths(kind: BrowserKind) -> Vec<PathBuf> {
    let candidates: &[&str] = match kind {
        BrowserKind::Edge => &[
            r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
            r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
        ],
        BrowserKind::Chrome => &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        ],
        BrowserKind::Chromium => &["/usr/bin/chromium", "/usr/bin/chromium-browser"],
        BrowserKind::Firefox => &[
            r"C:\Program Files\Mozilla Firefox\firefox.exe",
            "/Applications/Firefox.app/Contents/MacOS/firefox",
            "/usr/bin/firefox",
        ],
    };
    candidates.iter().map(PathBuf::from).collect()
}

fn resolve_kind(kind: BrowserKind) -> Option<PathBuf> {
    for name in executable_names(kind) {
        if let Ok(path) = which::which(name) {
            debug!("resolved {kind} via PATH: {}", path.display());
            return Some(path);
        }
    }
    well_known_paths(kind).into_iter().find(|p| p.exists())
}

/// Resolve the preferred browsers to executables that exist, in
/// preference order. An empty preference list means the built-in order.
pub fn resolve(preference: &[BrowserKind]) -> Vec<ResolvedBrowser> {
    let kinds: &[BrowserKind] = if preference.is_empty() {
        DEFAULT_PREFERENCE
    } else {
        preference
    };

    kinds
        .iter()
        .filter_map(|&kind| resolve_kind(kind).map(|path| ResolvedBrowser { kind, path }))
        .collect()
}

/// Fixed argument template for launching `kind` against `url`.
///
/// Chromium-family browsers get a dedicated profile directory so kiosk
/// state never touches the user's regular profile, and first-run UI is
/// suppressed; it would otherwise cover the page.
pub fn launch_args(kind: BrowserKind, url: &str, app_mode: bool, profile_dir: &Path) -> Vec<String> {
    match kind {
        BrowserKind::Edge | BrowserKind::Chrome | BrowserKind::Chromium => {
            let mut args = if app_mode {
                vec![format!("--app={url}")]
            } else {
                vec![url.to_string()]
            };
            args.push("--start-fullscreen".into());
            args.push(format!("--user-data-dir={}", profile_dir.display()));
            args.push("--no-first-run".into());
            args.push("--disable-first-run-ui".into());
            args
        }
        BrowserKind::Firefox => {
            vec!["--kiosk".into(), url.to_string()]
        }
    }
}

/// Profile directory used when the config does not set one.
pub fn default_profile_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("skipper")
        .join("viewer-profile")
}

/// Last-resort fallback: hand the URL to the system default handler.
/// The resulting process is not supervised and may need manual
/// fullscreen.
pub fn open_system_default(url: &str) -> std::io::Result<()> {
    open::that_detached(url)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_mode_args_for_edge() {
        let args = launch_args(
            BrowserKind::Edge,
            "http://127.0.0.1:5000/",
            true,
            Path::new("/tmp/profile"),
        );
        assert_eq!(args[0], "--app=http://127.0.0.1:5000/");
        assert!(args.contains(&"--start-fullscreen".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
        assert!(args.contains(&"--no-first-run".to_string()));
    }

    #[test]
    fn plain_url_args_without_app_mode() {
        let args = launch_args(
            BrowserKind::Chrome,
            "http://127.0.0.1:5000/",
            false,
            Path::new("/tmp/profile"),
        );
        assert_eq!(args[0], "http://127.0.0.1:5000/");
        assert!(args.contains(&"--start-fullscreen".to_string()));
    }

    #[test]
    fn firefox_uses_kiosk_flag() {
        let args = launch_args(
            BrowserKind::Firefox,
            "http://127.0.0.1:5000/",
            true,
            Path::new("/tmp/profile"),
        );
        assert_eq!(args, vec!["--kiosk", "http://127.0.0.1:5000/"]);
    }

    #[test]
    fn default_preference_covers_all_kinds() {
        assert_eq!(DEFAULT_PREFERENCE.len(), 4);
        assert_eq!(DEFAULT_PREFERENCE[0], BrowserKind::Edge);
    }

    #[test]
    fn resolve_honors_preference_order() {
        // Whatever resolves on this machine must come back in the order
        // asked for.
        let resolved = resolve(&[BrowserKind::Firefox, BrowserKind::Chromium]);
        let kinds: Vec<BrowserKind> = resolved.iter().map(|r| r.kind).collect();
        let mut last_index = 0;
        for kind in kinds {
            let index = [BrowserKind::Firefox, BrowserKind::Chromium]
                .iter()
                .position(|&k| k == kind)
                .unwrap();
            assert!(index >= last_index);
            last_index = index;
        }
    }

    #[test]
    fn default_profile_dir_is_under_skipper() {
        let dir = default_profile_dir();
        assert!(dir.to_string_lossy().contains("skipper"));
    }
}
