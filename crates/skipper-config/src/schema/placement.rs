//! Window search and placement retry policy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Move/resize attempts per window before giving up.
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// How long to keep polling for a process's first visible window.
    pub search_timeout_secs: u64,
    pub search_poll_ms: u64,
    /// How many parent links to follow when matching a window's owning
    /// process back to a launched process.
    pub ancestry_max_depth: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            retry_delay_ms: 500,
            search_timeout_secs: 20,
            search_poll_ms: 250,
            ancestry_max_depth: 8,
        }
    }
}
