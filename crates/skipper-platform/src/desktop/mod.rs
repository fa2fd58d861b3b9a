use serde::{Deserialize, Serialize};

use skipper_common::Rect;

use crate::monitors::Monitor;
use crate::Result;

#[cfg(target_os = "windows")]
pub mod win32;

pub mod fake;
pub mod noop;

/// Opaque handle to a top-level window owned by some process on the
/// desktop. Only meaningful to the backend that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

/// Snapshot of one top-level window as reported by the backend.
#[derive(Debug, Clone)]
pub struct TopLevelWindow {
    pub id: WindowId,
    pub title: String,
    /// OS pid of the process that owns the window.
    pub pid: u32,
    pub frame: Rect,
    pub is_visible: bool,
    pub is_minimized: bool,
}

/// Platform-agnostic trait for enumerating displays and controlling
/// external application windows.
pub trait Desktop: Send + Sync {
    /// Enumerate active displays in the platform's stable order. The
    /// returned list carries whatever indices the backend assigned;
    /// [`crate::MonitorRegistry`] re-indexes contiguously from 0.
    fn list_monitors(&self) -> Result<Vec<Monitor>>;

    /// Enumerate all top-level windows system-wide.
    fn list_windows(&self) -> Result<Vec<TopLevelWindow>>;

    /// Current bounds of a window, or `None` if it no longer exists.
    fn window_frame(&self, id: WindowId) -> Result<Option<Rect>>;

    /// Move and resize a window to the given bounds.
    fn set_window_frame(&self, id: WindowId, frame: Rect) -> Result<()>;

    /// Strip (or restore) window decorations so the frame can cover a
    /// monitor exactly.
    fn set_borderless(&self, id: WindowId, borderless: bool) -> Result<()>;

    /// Un-minimize a window and bring it to the foreground.
    fn restore_window(&self, id: WindowId) -> Result<()>;
}

/// Create the platform-appropriate Desktop backend.
///
/// On Windows: the Win32 backend.
/// On other platforms: a no-op implementation.
pub fn native_desktop() -> Box<dyn Desktop> {
    #[cfg(target_os = "windows")]
    {
        Box::new(win32::Win32Desktop)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(noop::NoopDesktop)
    }
}
