//! Window placement with bounded retries.
//!
//! Some applications ignore fullscreen flags or race the placement call
//! before their window finishes initializing, so a single move is not
//! enough. Each attempt re-queries the current bounds and stops early
//! once they match the target monitor exactly. Exhausting all attempts
//! is non-fatal: the window is left in whatever state the last attempt
//! produced, never hidden or destroyed.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use skipper_platform::desktop::{Desktop, WindowId};
use skipper_platform::monitors::Monitor;
use skipper_platform::process_tree::ProcessTree;

use crate::locator::{find_window, SearchPolicy};

/// The (window, monitor) pair a retry loop is trying to make converge.
#[derive(Debug, Clone)]
pub struct PlacementTarget {
    pub monitor: Monitor,
    /// Launched pid whose window tree we are placing. Lookup only; the
    /// supervisor owns the process.
    pub pid: u32,
    pub attempts_remaining: u32,
    pub found_window: Option<WindowId>,
}

impl PlacementTarget {
    pub fn new(monitor: Monitor, pid: u32, max_attempts: u32) -> Self {
        Self {
            monitor,
            pid,
            attempts_remaining: max_attempts,
            found_window: None,
        }
    }
}

/// Drive a window to exactly cover the target monitor. Returns `true`
/// once the re-queried bounds equal the target; bounds that already
/// match on the first check succeed immediately with no mutation.
pub async fn place(
    desktop: &dyn Desktop,
    target: &mut PlacementTarget,
    retry_delay: Duration,
    token: &CancellationToken,
) -> bool {
    let Some(window) = target.found_window else {
        return false;
    };
    let bounds = target.monitor.bounds;

    while target.attempts_remaining > 0 {
        if token.is_cancelled() {
            return false;
        }
        target.attempts_remaining -= 1;

        match desktop.window_frame(window) {
            Ok(Some(frame)) if frame == bounds => {
                debug!("window {window:?} already at {bounds}");
                return true;
            }
            Ok(Some(frame)) => {
                trace!("window {window:?} at {frame}, want {bounds}");
            }
            Ok(None) => {
                debug!("window {window:?} disappeared during placement");
                return false;
            }
            Err(e) => {
                debug!("bounds query for {window:?} failed: {e}");
            }
        }

        // Restore first: a minimized window will not move, and the
        // decorations have to go before the frame can cover the monitor
        // edge to edge.
        if let Err(e) = desktop.restore_window(window) {
            trace!("restore of {window:?} failed: {e}");
        }
        if let Err(e) = desktop.set_borderless(window, true) {
            trace!("style change of {window:?} failed: {e}");
        }
        if let Err(e) = desktop.set_window_frame(window, bounds) {
            debug!("move of {window:?} to {bounds} failed: {e}");
        }

        // Re-check right away so a compliant window does not burn the
        // retry delay.
        if matches!(desktop.window_frame(window), Ok(Some(frame)) if frame == bounds) {
            debug!("window {window:?} placed at {bounds}");
            return true;
        }

        if target.attempts_remaining > 0 {
            tokio::select! {
                _ = token.cancelled() => return false,
                _ = tokio::time::sleep(retry_delay) => {}
            }
        }
    }

    warn!(
        "placement of window {window:?} on monitor {} exhausted retries, leaving as-is",
        target.monitor.index
    );
    false
}

/// One placement task: locate the process's window, then drive it onto
/// the monitor. A missing window is logged and skipped, not an error.
pub async fn place_process_window(
    desktop: &dyn Desktop,
    tree: &dyn ProcessTree,
    mut target: PlacementTarget,
    search: SearchPolicy,
    retry_delay: Duration,
    token: CancellationToken,
) -> bool {
    match find_window(desktop, tree, target.pid, &search, &token).await {
        Some(window) => {
            target.found_window = Some(window);
            place(desktop, &mut target, retry_delay, &token).await
        }
        None => {
            if !token.is_cancelled() {
                warn!(
                    "no window found for pid {}, skipping placement on monitor {}",
                    target.pid, target.monitor.index
                );
            }
            false
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
