//! Window search for launched processes.
//!
//! A target process (especially a browser) takes a variable amount of
//! time to create its first visible top-level window, and the window
//! may belong to a child process rather than the one launched. So: poll
//! the full window enumeration, resolve each candidate's owning pid,
//! and walk its ancestry back to the launched pid. First match in
//! enumeration order wins; multiple qualifying windows are rare and a
//! fixed enumeration order keeps the pick deterministic.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use skipper_platform::desktop::{Desktop, WindowId};
use skipper_platform::process_tree::{is_descendant_of, ProcessTree};

#[derive(Debug, Clone)]
pub struct SearchPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub ancestry_max_depth: u32,
}

/// Find the first visible, non-empty top-level window owned by
/// `root_pid` or any of its descendants. `None` once `timeout` elapses
/// or the token is cancelled.
pub async fn find_window(
    desktop: &dyn Desktop,
    tree: &dyn ProcessTree,
    root_pid: u32,
    policy: &SearchPolicy,
    token: &CancellationToken,
) -> Option<WindowId> {
    let deadline = Instant::now() + policy.timeout;

    loop {
        if token.is_cancelled() {
            return None;
        }

        match desktop.list_windows() {
            Ok(windows) => {
                for window in windows {
                    if !window.is_visible || window.frame.is_empty() {
                        continue;
                    }
                    if is_descendant_of(tree, root_pid, window.pid, policy.ancestry_max_depth) {
                        debug!(
                            "found window {:?} (\"{}\", pid {}) for pid {root_pid}",
                            window.id, window.title, window.pid
                        );
                        return Some(window.id);
                    }
                    trace!(
                        "window {:?} (pid {}) not in pid {root_pid}'s tree",
                        window.id,
                        window.pid
                    );
                }
            }
            Err(e) => debug!("window enumeration failed, retrying: {e}"),
        }

        if Instant::now() >= deadline {
            debug!("no window for pid {root_pid} within {:?}", policy.timeout);
            return None;
        }

        tokio::select! {
            _ = token.cancelled() => return None,
            _ = tokio::time::sleep(policy.poll_interval) => {}
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
