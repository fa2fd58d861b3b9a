//! In-memory Desktop backend for tests.
//!
//! Holds a mutable window table behind a mutex so tests can stage
//! windows appearing late, windows that ignore the first few move
//! requests, and arbitrary monitor layouts.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use skipper_common::Rect;

use super::{Desktop, TopLevelWindow, WindowId};
use crate::monitors::Monitor;
use crate::Result;

#[derive(Default)]
pub struct FakeDesktop {
    monitors: Vec<Monitor>,
    windows: Mutex<Vec<TopLevelWindow>>,
    borderless: Mutex<HashSet<WindowId>>,
    restored: Mutex<Vec<WindowId>>,
    moves: Mutex<Vec<(WindowId, Rect)>>,
    /// Windows that swallow the next N `set_window_frame` calls before
    /// the frame actually sticks, mimicking applications that re-apply
    /// their own geometry while still initializing.
    stubborn: Mutex<HashMap<WindowId, u32>>,
}

impl FakeDesktop {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors,
            ..Default::default()
        }
    }

    pub fn add_window(&self, window: TopLevelWindow) {
        self.windows.lock().unwrap().push(window);
    }

    pub fn remove_window(&self, id: WindowId) {
        self.windows.lock().unwrap().retain(|w| w.id != id);
    }

    /// Make a window ignore the next `count` move requests.
    pub fn make_stubborn(&self, id: WindowId, count: u32) {
        self.stubborn.lock().unwrap().insert(id, count);
    }

    /// Every `(window, target)` pair passed to `set_window_frame`, in order.
    pub fn move_requests(&self) -> Vec<(WindowId, Rect)> {
        self.moves.lock().unwrap().clone()
    }

    pub fn restore_requests(&self) -> Vec<WindowId> {
        self.restored.lock().unwrap().clone()
    }

    pub fn is_borderless(&self, id: WindowId) -> bool {
        self.borderless.lock().unwrap().contains(&id)
    }
}

impl Desktop for FakeDesktop {
    fn list_monitors(&self) -> Result<Vec<Monitor>> {
        Ok(self.monitors.clone())
    }

    fn list_windows(&self) -> Result<Vec<TopLevelWindow>> {
        Ok(self.windows.lock().unwrap().clone())
    }

    fn window_frame(&self, id: WindowId) -> Result<Option<Rect>> {
        Ok(self
            .windows
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.frame))
    }

    fn set_window_frame(&self, id: WindowId, frame: Rect) -> Result<()> {
        self.moves.lock().unwrap().push((id, frame));

        let mut stubborn = self.stubborn.lock().unwrap();
        if let Some(remaining) = stubborn.get_mut(&id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(());
            }
        }
        drop(stubborn);

        if let Some(w) = self.windows.lock().unwrap().iter_mut().find(|w| w.id == id) {
            w.frame = frame;
        }
        Ok(())
    }

    fn set_borderless(&self, id: WindowId, borderless: bool) -> Result<()> {
        let mut set = self.borderless.lock().unwrap();
        if borderless {
            set.insert(id);
        } else {
            set.remove(&id);
        }
        Ok(())
    }

    fn restore_window(&self, id: WindowId) -> Result<()> {
        self.restored.lock().unwrap().push(id);
        if let Some(w) = self.windows.lock().unwrap().iter_mut().find(|w| w.id == id) {
            w.is_minimized = false;
        }
        Ok(())
    }
}
