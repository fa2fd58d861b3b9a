//! Windows Desktop implementation (stub).
//!
//! Will use Win32 API (EnumDisplayMonitors, EnumWindows, SetWindowPos,
//! GetWindowLongPtr/SetWindowLongPtr for style stripping) when
//! implemented. For now, behaves like the no-op backend.

use skipper_common::Rect;

use super::{Desktop, TopLevelWindow, WindowId};
use crate::monitors::Monitor;
use crate::Result;

/// Win32-based desktop backend (stub).
pub struct Win32Desktop;

impl Desktop for Win32Desktop {
    fn list_monitors(&self) -> Result<Vec<Monitor>> {
        Ok(Vec::new())
    }

    fn list_windows(&self) -> Result<Vec<TopLevelWindow>> {
        Ok(Vec::new())
    }

    fn window_frame(&self, _id: WindowId) -> Result<Option<Rect>> {
        Ok(None)
    }

    fn set_window_frame(&self, _id: WindowId, _frame: Rect) -> Result<()> {
        Ok(())
    }

    fn set_borderless(&self, _id: WindowId, _borderless: bool) -> Result<()> {
        Ok(())
    }

    fn restore_window(&self, _id: WindowId) -> Result<()> {
        Ok(())
    }
}
