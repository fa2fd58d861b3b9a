//! Child-process supervision.
//!
//! The supervisor owns every process skipper launches: the two station
//! applications and the browser. Termination always targets the whole
//! descendant tree, since a launched browser may hand off to a separate
//! rendering process. The registry is mutex-guarded because the
//! shutdown path requests termination concurrently with liveness
//! checks on the orchestration path.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use skipper_common::{ProcessId, ProcessState, SupervisorError};
use skipper_platform::ProcessTree;

/// How often the grace-period wait re-checks liveness.
const GRACE_POLL: Duration = Duration::from_millis(100);

/// Cheap copyable reference to a supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle {
    pub id: ProcessId,
    pub pid: u32,
}

struct ManagedProcess {
    id: ProcessId,
    pid: u32,
    executable: PathBuf,
    state: ProcessState,
    started_at: Instant,
    child: Option<Child>,
}

pub struct ProcessSupervisor {
    tree: Arc<dyn ProcessTree>,
    procs: Mutex<Vec<ManagedProcess>>,
    next_id: AtomicU32,
}

impl ProcessSupervisor {
    pub fn new(tree: Arc<dyn ProcessTree>) -> Self {
        Self {
            tree,
            procs: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Start a child process. Returns as soon as the OS has scheduled
    /// it; "running" says nothing about the application being
    /// initialized. The working directory is the executable's own
    /// directory, matching how these applications expect to be started.
    pub fn launch(&self, path: &Path, args: &[String]) -> Result<ProcessHandle, SupervisorError> {
        let mut cmd = Command::new(path);
        cmd.args(args);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }
        cmd.kill_on_drop(false);

        let child = cmd.spawn().map_err(|source| SupervisorError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;
        // A child reaped before its pid could be read has nothing left
        // to place or tree-terminate; record it as already terminated
        // rather than letting a made-up pid reach ancestry queries.
        let (pid, state) = match child.id() {
            Some(pid) => (pid, ProcessState::Running),
            None => (0, ProcessState::Terminated),
        };

        let id = ProcessId(self.next_id.fetch_add(1, Ordering::Relaxed));
        info!("launched {} as {} (pid {})", path.display(), id, pid);

        self.procs.lock().unwrap().push(ManagedProcess {
            id,
            pid,
            executable: path.to_path_buf(),
            state,
            started_at: Instant::now(),
            child: Some(child),
        });

        Ok(ProcessHandle { id, pid })
    }

    /// Whether the process is still running. Reaps exit status as a
    /// side effect so children that died on their own are reflected.
    pub fn is_alive(&self, id: ProcessId) -> bool {
        let mut procs = self.procs.lock().unwrap();
        let Some(entry) = procs.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        match entry.state {
            ProcessState::Terminated | ProcessState::Failed => false,
            _ => match entry.child.as_mut().map(|c| c.try_wait()) {
                Some(Ok(None)) => true,
                Some(Ok(Some(status))) => {
                    debug!("{} exited on its own: {status}", entry.id);
                    entry.state = ProcessState::Terminated;
                    entry.child = None;
                    false
                }
                Some(Err(e)) => {
                    warn!("wait on {} failed: {e}", entry.id);
                    entry.state = ProcessState::Failed;
                    false
                }
                None => false,
            },
        }
    }

    pub fn state_of(&self, id: ProcessId) -> Option<ProcessState> {
        self.procs
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.state)
    }

    pub fn handles(&self) -> Vec<ProcessHandle> {
        self.procs
            .lock()
            .unwrap()
            .iter()
            .map(|p| ProcessHandle { id: p.id, pid: p.pid })
            .collect()
    }

    /// Terminate a process and its descendant tree: polite exit request
    /// first, forced kill for whatever is still alive after `grace`.
    /// Terminating an already-terminated process is a no-op.
    pub async fn terminate(&self, id: ProcessId, grace: Duration) {
        if !self.is_alive(id) {
            self.mark_terminated(id);
            return;
        }
        let Some(pid) = self
            .procs
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.pid)
        else {
            return;
        };

        // Descendants first so the list is complete before the parent
        // starts tearing them down itself.
        let mut targets = self.tree.descendants_of(pid);
        targets.push(pid);

        debug!("terminating {} (pid {pid}, {} process(es))", id, targets.len());
        for &target in &targets {
            self.tree.request_exit(target);
        }

        let deadline = Instant::now() + grace;
        loop {
            targets.retain(|&t| self.tree.is_alive(t));
            if targets.is_empty() || Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(GRACE_POLL.min(grace)).await;
        }

        for &target in &targets {
            warn!("{} (pid {target}) ignored exit request, force killing", id);
            self.tree.force_kill(target);
        }

        self.mark_terminated(id);
    }

    /// Terminate every supervised process. Idempotent: a second call
    /// finds only terminated entries and does nothing.
    pub async fn terminate_all(&self, grace: Duration) {
        let ids: Vec<ProcessId> = self.procs.lock().unwrap().iter().map(|p| p.id).collect();
        for id in ids {
            self.terminate(id, grace).await;
        }
    }

    /// Executables of processes still alive, for diagnostics.
    pub fn live_executables(&self) -> Vec<PathBuf> {
        let ids = self.handles();
        ids.into_iter()
            .filter(|h| self.is_alive(h.id))
            .filter_map(|h| {
                self.procs
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|p| p.id == h.id)
                    .map(|p| p.executable.clone())
            })
            .collect()
    }

    fn mark_terminated(&self, id: ProcessId) {
        let mut procs = self.procs.lock().unwrap();
        if let Some(entry) = procs.iter_mut().find(|p| p.id == id) {
            if entry.state != ProcessState::Failed {
                entry.state = ProcessState::Terminated;
            }
            debug!(
                "{} ({}) terminated after {:?}",
                entry.id,
                entry.executable.display(),
                entry.started_at.elapsed()
            );
            // Reap asynchronously; the process may take a moment to die.
            if let Some(mut child) = entry.child.take() {
                tokio::spawn(async move {
                    let _ = child.wait().await;
                });
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use skipper_platform::native_process_tree;

    fn supervisor() -> ProcessSupervisor {
        ProcessSupervisor::new(Arc::new(native_process_tree()))
    }

    #[tokio::test]
    async fn launch_missing_executable_is_spawn_error() {
        let sup = supervisor();
        let err = sup
            .launch(Path::new("/nonexistent/no-such-binary"), &[])
            .unwrap_err();
        assert!(matches!(err, SupervisorError::Spawn { .. }));
        assert!(sup.handles().is_empty());
    }

    #[tokio::test]
    async fn launch_and_terminate_sleep() {
        let sup = supervisor();
        let handle = sup
            .launch(Path::new("/bin/sleep"), &["30".into()])
            .unwrap();
        assert!(sup.is_alive(handle.id));
        assert_eq!(sup.state_of(handle.id), Some(ProcessState::Running));

        sup.terminate(handle.id, Duration::from_secs(2)).await;
        assert!(!sup.is_alive(handle.id));
        assert_eq!(sup.state_of(handle.id), Some(ProcessState::Terminated));
    }

    #[tokio::test]
    async fn terminate_already_terminated_is_noop() {
        let sup = supervisor();
        let handle = sup
            .launch(Path::new("/bin/sleep"), &["30".into()])
            .unwrap();
        sup.terminate(handle.id, Duration::from_secs(2)).await;
        sup.terminate(handle.id, Duration::from_secs(2)).await;
        assert_eq!(sup.state_of(handle.id), Some(ProcessState::Terminated));
    }

    #[tokio::test]
    async fn terminate_all_is_idempotent() {
        let sup = supervisor();
        let a = sup
            .launch(Path::new("/bin/sleep"), &["30".into()])
            .unwrap();
        let b = sup
            .launch(Path::new("/bin/sleep"), &["30".into()])
            .unwrap();

        sup.terminate_all(Duration::from_secs(2)).await;
        assert!(!sup.is_alive(a.id));
        assert!(!sup.is_alive(b.id));

        sup.terminate_all(Duration::from_secs(2)).await;
        assert!(sup.live_executables().is_empty());
    }

    #[tokio::test]
    async fn terminated_child_never_touches_process_tree() {
        use skipper_platform::process_tree::FakeProcessTree;

        let tree = Arc::new(FakeProcessTree::new());
        let sup = ProcessSupervisor::new(tree.clone());
        let handle = sup.launch(Path::new("/bin/true"), &[]).unwrap();
        // Let the child exit and get reaped.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!sup.is_alive(handle.id));

        sup.terminate(handle.id, Duration::from_secs(1)).await;
        assert!(tree.exit_requests().is_empty());
        assert!(tree.kills().is_empty());
    }

    #[tokio::test]
    async fn exited_child_is_reaped_by_liveness_check() {
        let sup = supervisor();
        let handle = sup.launch(Path::new("/bin/true"), &[]).unwrap();
        // Give the child a moment to exit on its own.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!sup.is_alive(handle.id));
        assert_eq!(sup.state_of(handle.id), Some(ProcessState::Terminated));
    }
}
