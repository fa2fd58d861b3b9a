//! Monitor enumeration snapshot.
//!
//! The registry is taken once at startup and cached for the process
//! lifetime; monitor hot-plug is out of scope. Indices are the contract
//! applications configure against, so they are re-assigned contiguously
//! from 0 in the backend's enumeration order regardless of what the
//! backend reported.

use serde::{Deserialize, Serialize};

use skipper_common::{PlatformError, Rect};

use crate::desktop::Desktop;

/// One physical display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    /// 0-based ordinal in enumeration order, stable for the process
    /// lifetime.
    pub index: usize,
    pub bounds: Rect,
    pub is_primary: bool,
}

/// Immutable snapshot of the display topology.
#[derive(Debug, Clone)]
pub struct MonitorRegistry {
    monitors: Vec<Monitor>,
}

impl MonitorRegistry {
    /// Enumerate displays through the backend. Fails if the platform
    /// reports zero monitors; targeted placement is meaningless then and
    /// callers treat this as fatal.
    pub fn snapshot(desktop: &dyn Desktop) -> Result<Self, PlatformError> {
        let enumerated = desktop.list_monitors()?;
        if enumerated.is_empty() {
            return Err(PlatformError::MonitorEnumeration(
                "platform reported zero active displays".into(),
            ));
        }

        let monitors = enumerated
            .into_iter()
            .enumerate()
            .map(|(index, m)| Monitor { index, ..m })
            .collect();

        Ok(Self { monitors })
    }

    /// Build a registry from a fixed layout, re-indexing contiguously.
    /// Intended for tests and diagnostics.
    pub fn from_monitors(monitors: Vec<Monitor>) -> Result<Self, PlatformError> {
        if monitors.is_empty() {
            return Err(PlatformError::MonitorEnumeration(
                "monitor list is empty".into(),
            ));
        }
        let monitors = monitors
            .into_iter()
            .enumerate()
            .map(|(index, m)| Monitor { index, ..m })
            .collect();
        Ok(Self { monitors })
    }

    pub fn get(&self, index: usize) -> Option<&Monitor> {
        self.monitors.get(index)
    }

    pub fn primary(&self) -> Option<&Monitor> {
        self.monitors
            .iter()
            .find(|m| m.is_primary)
            .or_else(|| self.monitors.first())
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}
