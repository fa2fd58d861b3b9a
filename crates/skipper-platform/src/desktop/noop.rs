//! No-op Desktop implementation.
//!
//! Used as a fallback on platforms where display and window control is
//! not yet implemented. Queries return empty results and mutations
//! succeed silently, so the orchestrator still launches and supervises
//! processes; placement simply never finds a window to move.

use skipper_common::Rect;

use super::{Desktop, TopLevelWindow, WindowId};
use crate::monitors::Monitor;
use crate::Result;

pub struct NoopDesktop;

impl Desktop for NoopDesktop {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_empty() {
        let desktop = NoopDesktop;
        assert!(desktop.list_windows().unwrap().is_empty());
        assert!(desktop.list_monitors().unwrap().is_empty());
    }

    #[test]
    fn frame_queries_return_none() {
        let desktop = NoopDesktop;
        assert!(desktop.window_frame(WindowId(1)).unwrap().is_none());
    }

    #[test]
    fn mutations_succeed() {
        let desktop = NoopDesktop;
        assert!(desktop
            .set_window_frame(WindowId(1), Rect::new(0, 0, 100, 100))
            .is_ok());
        assert!(desktop.set_borderless(WindowId(1), true).is_ok());
        assert!(desktop.restore_window(WindowId(1)).is_ok());
    }
}
