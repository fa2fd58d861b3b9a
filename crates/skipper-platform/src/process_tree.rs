//! Process ancestry queries and tree termination.
//!
//! A launched browser may hand off to a separate rendering process that
//! owns the actual window, and a terminated child must take its whole
//! descendant tree with it. Both concerns reduce to pid/parent-pid
//! queries, answered here through `sysinfo` so the rest of the crate
//! stays platform-agnostic.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use sysinfo::{Pid, ProcessesToUpdate, Signal, System};

/// Pid-level view of the OS process table.
pub trait ProcessTree: Send + Sync {
    /// Parent pid of `pid`, or `None` if the process is gone or has no
    /// parent.
    fn parent_of(&self, pid: u32) -> Option<u32>;

    /// All live descendants of `pid` (children, grandchildren, ...),
    /// not including `pid` itself.
    fn descendants_of(&self, pid: u32) -> Vec<u32>;

    fn is_alive(&self, pid: u32) -> bool;

    /// Ask the process to exit (SIGTERM-equivalent). Returns `false` if
    /// the process is already gone or the signal is unsupported.
    fn request_exit(&self, pid: u32) -> bool;

    /// Forcibly kill the process. Returns `false` if it was already gone.
    fn force_kill(&self, pid: u32) -> bool;
}

/// Walk `pid`'s ancestry up to `max_depth` levels looking for
/// `ancestor`. A window owned by any descendant of a launched process
/// counts as that process's window.
pub fn is_descendant_of(tree: &dyn ProcessTree, ancestor: u32, pid: u32, max_depth: u32) -> bool {
    if pid == ancestor {
        return true;
    }
    let mut current = pid;
    let mut seen = HashSet::new();
    for _ in 0..max_depth {
        let Some(parent) = tree.parent_of(current) else {
            return false;
        };
        if parent == ancestor {
            return true;
        }
        // Guard against cycles in a racing process table snapshot.
        if !seen.insert(parent) {
            return false;
        }
        current = parent;
    }
    false
}

/// `sysinfo`-backed implementation. Refreshes the process table on
/// every query; callers poll at coarse intervals so the cost is
/// acceptable and staleness is not.
pub struct SysinfoProcessTree {
    sys: Mutex<System>,
}

impl SysinfoProcessTree {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProcessTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTree for SysinfoProcessTree {
    fn parent_of(&self, pid: u32) -> Option<u32> {
        let mut sys = self.sys.lock().unwrap();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        sys.process(Pid::from_u32(pid))
            .and_then(|p| p.parent())
            .map(|p| p.as_u32())
    }

    fn descendants_of(&self, pid: u32) -> Vec<u32> {
        let mut sys = self.sys.lock().unwrap();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for (child, proc) in sys.processes() {
            if let Some(parent) = proc.parent() {
                children
                    .entry(parent.as_u32())
                    .or_default()
                    .push(child.as_u32());
            }
        }

        let mut result = Vec::new();
        let mut seen = HashSet::from([pid]);
        let mut queue = VecDeque::from([pid]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = children.get(&current) {
                for &kid in kids {
                    // The snapshot can contain parent cycles when pids
                    // are reused mid-refresh; visit each pid once.
                    if seen.insert(kid) {
                        result.push(kid);
                        queue.push_back(kid);
                    }
                }
            }
        }
        result
    }

    fn is_alive(&self, pid: u32) -> bool {
        let mut sys = self.sys.lock().unwrap();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        sys.process(Pid::from_u32(pid)).is_some()
    }

    fn request_exit(&self, pid: u32) -> bool {
        let mut sys = self.sys.lock().unwrap();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        sys.process(Pid::from_u32(pid))
            .and_then(|p| p.kill_with(Signal::Term))
            .unwrap_or(false)
    }

    fn force_kill(&self, pid: u32) -> bool {
        let mut sys = self.sys.lock().unwrap();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        sys.process(Pid::from_u32(pid))
            .map(|p| p.kill())
            .unwrap_or(false)
    }
}

/// Create the default process-tree backend.
pub fn native_process_tree() -> SysinfoProcessTree {
    SysinfoProcessTree::new()
}

/// In-memory process table for tests.
#[derive(Default)]
pub struct FakeProcessTree {
    parents: Mutex<HashMap<u32, u32>>,
    dead: Mutex<HashSet<u32>>,
    exit_requests: Mutex<Vec<u32>>,
    kills: Mutex<Vec<u32>>,
    /// Pids that ignore `request_exit` and only die on `force_kill`.
    stubborn: Mutex<HashSet<u32>>,
}

impl FakeProcessTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_process(&self, pid: u32, parent: Option<u32>) {
        if let Some(parent) = parent {
            self.parents.lock().unwrap().insert(pid, parent);
        }
        self.dead.lock().unwrap().remove(&pid);
    }

    pub fn mark_dead(&self, pid: u32) {
        self.dead.lock().unwrap().insert(pid);
    }

    /// Make `pid` survive graceful exit requests.
    pub fn make_stubborn(&self, pid: u32) {
        self.stubborn.lock().unwrap().insert(pid);
    }

    pub fn exit_requests(&self) -> Vec<u32> {
        self.exit_requests.lock().unwrap().clone()
    }

    pub fn kills(&self) -> Vec<u32> {
        self.kills.lock().unwrap().clone()
    }
}

impl ProcessTree for FakeProcessTree {
    fn parent_of(&self, pid: u32) -> Option<u32> {
        if self.dead.lock().unwrap().contains(&pid) {
            return None;
        }
        self.parents.lock().unwrap().get(&pid).copied()
    }

    fn descendants_of(&self, pid: u32) -> Vec<u32> {
        let parents = self.parents.lock().unwrap();
        let dead = self.dead.lock().unwrap();
        let mut result = Vec::new();
        let mut seen = HashSet::from([pid]);
        let mut queue = VecDeque::from([pid]);
        while let Some(current) = queue.pop_front() {
            for (&child, &parent) in parents.iter() {
                if parent == current && !dead.contains(&child) && seen.insert(child) {
                    result.push(child);
                    queue.push_back(child);
                }
            }
        }
        result
    }

    fn is_alive(&self, pid: u32) -> bool {
        !self.dead.lock().unwrap().contains(&pid)
    }

    fn request_exit(&self, pid: u32) -> bool {
        self.exit_requests.lock().unwrap().push(pid);
        if self.dead.lock().unwrap().contains(&pid) {
            return false;
        }
        if !self.stubborn.lock().unwrap().contains(&pid) {
            self.dead.lock().unwrap().insert(pid);
        }
        true
    }

    fn force_kill(&self, pid: u32) -> bool {
        self.kills.lock().unwrap().push(pid);
        self.dead.lock().unwrap().insert(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestry_direct_parent() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        tree.add_process(200, Some(100));
        assert!(is_descendant_of(&tree, 100, 200, 8));
    }

    #[test]
    fn ancestry_matches_at_depth() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        tree.add_process(200, Some(100));
        tree.add_process(300, Some(200));
        tree.add_process(400, Some(300));
        assert!(is_descendant_of(&tree, 100, 400, 8));
    }

    #[test]
    fn ancestry_same_pid_matches() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        assert!(is_descendant_of(&tree, 100, 100, 8));
    }

    #[test]
    fn ancestry_bounded_by_depth() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        tree.add_process(200, Some(100));
        tree.add_process(300, Some(200));
        tree.add_process(400, Some(300));
        assert!(!is_descendant_of(&tree, 100, 400, 2));
    }

    #[test]
    fn ancestry_unrelated_process() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        tree.add_process(500, Some(1));
        assert!(!is_descendant_of(&tree, 100, 500, 8));
    }

    #[test]
    fn ancestry_survives_cycles() {
        let tree = FakeProcessTree::new();
        tree.add_process(200, Some(300));
        tree.add_process(300, Some(200));
        assert!(!is_descendant_of(&tree, 100, 200, 32));
    }

    #[test]
    fn fake_descendants_walks_grandchildren() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        tree.add_process(200, Some(100));
        tree.add_process(300, Some(200));
        tree.add_process(999, None);

        let mut descendants = tree.descendants_of(100);
        descendants.sort_unstable();
        assert_eq!(descendants, vec![200, 300]);
    }

    #[test]
    fn descendants_terminate_on_cyclic_snapshot() {
        // Pid reuse can leave two processes recorded as each other's
        // parent; the walk must still finish.
        let tree = FakeProcessTree::new();
        tree.add_process(200, Some(300));
        tree.add_process(300, Some(200));

        let descendants = tree.descendants_of(200);
        assert_eq!(descendants, vec![300]);
    }

    #[test]
    fn descendants_contain_no_duplicates() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        tree.add_process(200, Some(100));
        tree.add_process(300, Some(200));
        tree.add_process(400, Some(300));

        let mut descendants = tree.descendants_of(100);
        assert_eq!(descendants.len(), 3);
        descendants.sort_unstable();
        assert_eq!(descendants, vec![200, 300, 400]);
    }

    #[test]
    fn fake_exit_request_kills_compliant_process() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        assert!(tree.request_exit(100));
        assert!(!tree.is_alive(100));
    }

    #[test]
    fn fake_stubborn_process_needs_force_kill() {
        let tree = FakeProcessTree::new();
        tree.add_process(100, None);
        tree.make_stubborn(100);

        tree.request_exit(100);
        assert!(tree.is_alive(100));
        tree.force_kill(100);
        assert!(!tree.is_alive(100));
    }

    #[test]
    fn sysinfo_tree_sees_own_process() {
        let tree = SysinfoProcessTree::new();
        let me = std::process::id();
        assert!(tree.is_alive(me));
    }
}
