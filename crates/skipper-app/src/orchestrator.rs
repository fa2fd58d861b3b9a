//! Top-level launch-and-place sequence.
//!
//! Drives the phases `Init -> LaunchingPrimary -> LaunchingSecondary ->
//! WaitingForService -> LaunchingViewer -> Placing -> Running ->
//! ShuttingDown -> Done`. Launches are strictly sequential; the
//! placement retry loops run as independent tasks so a stuck search for
//! one window never blocks the other's placement. Non-fatal problems
//! (service never ready, window not found, placement exhausted) are
//! logged and the sequence proceeds: something visible, possibly
//! misplaced, beats nothing launched.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use skipper_common::{SkipperError, SupervisorError};
use skipper_config::SkipperConfig;
use skipper_platform::desktop::Desktop;
use skipper_platform::monitors::MonitorRegistry;
use skipper_platform::process_tree::ProcessTree;

use crate::browser;
use crate::locator::SearchPolicy;
use crate::placer::{place_process_window, PlacementTarget};
use crate::probe::{wait_for_port, ReadinessCheck};
use crate::supervisor::{ProcessHandle, ProcessSupervisor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    LaunchingPrimary,
    LaunchingSecondary,
    WaitingForService,
    LaunchingViewer,
    Placing,
    Running,
    ShuttingDown,
    Done,
}

pub struct Orchestrator {
    config: SkipperConfig,
    desktop: Arc<dyn Desktop>,
    tree: Arc<dyn ProcessTree>,
    supervisor: Arc<ProcessSupervisor>,
    token: CancellationToken,
    phase: Phase,
    degraded_start: bool,
    skip_viewer: bool,
    placements: Vec<JoinHandle<()>>,
}

impl Orchestrator {
    pub fn new(
        config: SkipperConfig,
        desktop: Arc<dyn Desktop>,
        tree: Arc<dyn ProcessTree>,
        token: CancellationToken,
    ) -> Self {
        let supervisor = Arc::new(ProcessSupervisor::new(tree.clone()));
        Self {
            config,
            desktop,
            tree,
            supervisor,
            token,
            phase: Phase::Init,
            degraded_start: false,
            skip_viewer: false,
            placements: Vec::new(),
        }
    }

    pub fn with_skip_viewer(mut self, skip: bool) -> Self {
        self.skip_viewer = skip;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the service never became ready and the sequence
    /// continued degraded.
    pub fn degraded_start(&self) -> bool {
        self.degraded_start
    }

    pub fn supervisor(&self) -> &Arc<ProcessSupervisor> {
        &self.supervisor
    }

    /// Run the full sequence. Returns once the shutdown signal has been
    /// handled (or immediately with an error on a fatal failure, after
    /// best-effort cleanup of anything already launched).
    pub async fn run(&mut self) -> Result<(), SkipperError> {
        self.set_phase(Phase::Init);
        let registry = match MonitorRegistry::snapshot(self.desktop.as_ref()) {
            Ok(registry) => registry,
            Err(e) => {
                error!("cannot enumerate monitors, aborting: {e}");
                self.phase = Phase::Done;
                return Err(e.into());
            }
        };
        for monitor in registry.monitors() {
            info!(
                "monitor {}: {}{}",
                monitor.index,
                monitor.bounds,
                if monitor.is_primary { " (primary)" } else { "" }
            );
        }

        self.set_phase(Phase::LaunchingPrimary);
        let primary_cfg = self.config.apps.primary.clone();
        let primary = match self.supervisor.launch(&primary_cfg.path, &primary_cfg.args) {
            Ok(handle) => handle,
            Err(e) => return self.fail(e).await,
        };

        self.set_phase(Phase::LaunchingSecondary);
        let secondary_cfg = self.config.apps.secondary.clone();
        let secondary = match self
            .supervisor
            .launch(&secondary_cfg.path, &secondary_cfg.args)
        {
            Ok(handle) => handle,
            Err(e) => return self.fail(e).await,
        };

        self.set_phase(Phase::WaitingForService);
        let check = ReadinessCheck {
            host: self.config.service.host.clone(),
            port: self.config.service.port,
            timeout: Duration::from_secs(self.config.service.wait_timeout_secs),
            poll_interval: Duration::from_millis(self.config.service.poll_interval_ms),
        };
        let ready = wait_for_port(&check, &self.token).await;
        if self.token.is_cancelled() {
            return self.finish_shutdown().await;
        }
        if ready {
            info!("service ready on {}:{}", check.host, check.port);
        } else {
            // Launch the viewer anyway so the operator sees an error
            // page rather than nothing.
            warn!(
                "service on {}:{} not ready after {:?}, continuing degraded",
                check.host, check.port, check.timeout
            );
            self.degraded_start = true;
        }

        let delay = Duration::from_millis(self.config.service.post_ready_delay_ms);
        if !delay.is_zero() {
            tokio::select! {
                _ = self.token.cancelled() => return self.finish_shutdown().await,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.set_phase(Phase::LaunchingViewer);
        let viewer = if self.skip_viewer {
            info!("viewer launch skipped by request");
            None
        } else {
            self.launch_viewer()
        };
        if self.token.is_cancelled() {
            return self.finish_shutdown().await;
        }

        self.set_phase(Phase::Placing);
        self.schedule_placement(&registry, primary, primary_cfg.monitor, "primary");
        if let Some(index) = secondary_cfg.monitor {
            self.schedule_placement(&registry, secondary, Some(index), "secondary");
        }
        if let Some(viewer) = viewer {
            self.schedule_placement(&registry, viewer, self.config.viewer.monitor, "viewer");
        }

        self.set_phase(Phase::Running);
        self.token.cancelled().await;

        self.finish_shutdown().await
    }

    /// Spawn one independent placement task for a launched process.
    fn schedule_placement(
        &mut self,
        registry: &MonitorRegistry,
        handle: ProcessHandle,
        monitor_index: Option<usize>,
        role: &'static str,
    ) {
        let Some(index) = monitor_index else {
            return;
        };
        let Some(monitor) = registry.get(index).copied() else {
            warn!(
                "{role} wants monitor {index} but only {} monitor(s) exist, skipping placement",
                registry.len()
            );
            return;
        };

        info!("scheduling {role} window placement on monitor {index}");
        let desktop = self.desktop.clone();
        let tree = self.tree.clone();
        let token = self.token.clone();
        let search = SearchPolicy {
            timeout: Duration::from_secs(self.config.placement.search_timeout_secs),
            poll_interval: Duration::from_millis(self.config.placement.search_poll_ms),
            ancestry_max_depth: self.config.placement.ancestry_max_depth,
        };
        let retry_delay = Duration::from_millis(self.config.placement.retry_delay_ms);
        let target = PlacementTarget::new(monitor, handle.pid, self.config.placement.max_attempts);

        self.placements.push(tokio::spawn(async move {
            place_process_window(
                desktop.as_ref(),
                tree.as_ref(),
                target,
                search,
                retry_delay,
                token,
            )
            .await;
        }));
    }

    /// Resolve and launch the viewer, trying each preferred browser in
    /// order and falling back to the system default handler.
    fn launch_viewer(&self) -> Option<ProcessHandle> {
        let url = self.config.service.viewer_url();
        let profile_dir = self
            .config
            .viewer
            .profile_dir
            .clone()
            .unwrap_or_else(browser::default_profile_dir);

        for candidate in browser::resolve(&self.config.viewer.browsers) {
            let args = browser::launch_args(
                candidate.kind,
                &url,
                self.config.viewer.app_mode,
                &profile_dir,
            );
            match self.supervisor.launch(&candidate.path, &args) {
                Ok(handle) => {
                    info!("launched {} viewer for {url}", candidate.kind);
                    return Some(handle);
                }
                Err(e) => warn!("viewer candidate {} failed: {e}", candidate.kind),
            }
        }

        warn!("no preferred browser resolved, handing {url} to the system default");
        if let Err(e) = browser::open_system_default(&url) {
            error!("system default browser launch failed: {e}");
        }
        None
    }

    /// Fatal launch failure: clean up whatever already started, then
    /// surface the error.
    async fn fail(&mut self, err: SupervisorError) -> Result<(), SkipperError> {
        error!("launch failed: {err}");
        let _ = self.finish_shutdown().await;
        Err(err.into())
    }

    async fn finish_shutdown(&mut self) -> Result<(), SkipperError> {
        self.set_phase(Phase::ShuttingDown);
        // Placement tasks are cancelled, not awaited; the shared token
        // has them exiting on their own anyway.
        for task in self.placements.drain(..) {
            task.abort();
        }
        let grace = Duration::from_secs(self.config.shutdown.grace_timeout_secs);
        self.supervisor.terminate_all(grace).await;
        let leftovers = self.supervisor.live_executables();
        if leftovers.is_empty() {
            info!("all supervised processes terminated");
        } else {
            warn!("{} supervised process(es) survived termination", leftovers.len());
        }
        self.set_phase(Phase::Done);
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use skipper_common::Rect;
    use skipper_platform::desktop::fake::FakeDesktop;
    use skipper_platform::monitors::Monitor;
    use skipper_platform::desktop::noop::NoopDesktop;
    use skipper_platform::process_tree::FakeProcessTree;

    fn monitor(index: usize, x: i32) -> Monitor {
        Monitor {
            index,
            bounds: Rect::new(x, 0, 1920, 1080),
            is_primary: index == 0,
        }
    }

    fn two_monitor_desktop() -> Arc<FakeDesktop> {
        Arc::new(FakeDesktop::new(vec![monitor(0, 0), monitor(1, 1920)]))
    }

    fn base_config() -> SkipperConfig {
        let mut config: SkipperConfig = Default::default();
        config.service.wait_timeout_secs = 0;
        config.service.poll_interval_ms = 50;
        config.service.post_ready_delay_ms = 0;
        config.placement.search_timeout_secs = 1;
        config.placement.search_poll_ms = 20;
        config.shutdown.grace_timeout_secs = 2;
        config
    }

    #[tokio::test]
    async fn zero_monitors_is_fatal_and_terminal() {
        let config = base_config();
        let token = CancellationToken::new();
        let mut orch = Orchestrator::new(
            config,
            Arc::new(NoopDesktop),
            Arc::new(FakeProcessTree::new()),
            token,
        );

        let err = orch.run().await.unwrap_err();
        assert!(matches!(err, SkipperError::Platform(_)));
        assert_eq!(orch.phase(), Phase::Done);
        assert!(orch.supervisor().handles().is_empty());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::path::PathBuf;
        use std::time::Duration;

        fn sleep_config() -> SkipperConfig {
            let mut config = base_config();
            config.apps.primary.path = PathBuf::from("/bin/sleep");
            config.apps.primary.args = vec!["30".into()];
            config.apps.secondary.path = PathBuf::from("/bin/sleep");
            config.apps.secondary.args = vec!["30".into()];
            config
        }

        #[tokio::test]
        async fn primary_spawn_failure_skips_secondary() {
            let mut config = sleep_config();
            config.apps.primary.path = PathBuf::from("/nonexistent/no-such-app");

            let token = CancellationToken::new();
            let mut orch = Orchestrator::new(
                config,
                two_monitor_desktop(),
                Arc::new(skipper_platform::native_process_tree()),
                token,
            )
            .with_skip_viewer(true);

            let err = orch.run().await.unwrap_err();
            assert!(matches!(err, SkipperError::Supervisor(_)));
            assert_eq!(orch.phase(), Phase::Done);
            // The secondary was never launched.
            assert!(orch.supervisor().handles().is_empty());
        }

        #[tokio::test]
        async fn probe_timeout_still_reaches_viewer_phase_degraded() {
            // Port 1 on localhost is essentially never open.
            let mut config = sleep_config();
            config.service.port = 1;
            config.service.wait_timeout_secs = 0;

            let token = CancellationToken::new();
            let run_token = token.clone();
            let mut orch = Orchestrator::new(
                config,
                two_monitor_desktop(),
                Arc::new(skipper_platform::native_process_tree()),
                run_token,
            )
            .with_skip_viewer(true);

            let runner = tokio::spawn(async move {
                let result = orch.run().await;
                (orch, result)
            });
            tokio::time::sleep(Duration::from_millis(500)).await;
            token.cancel();

            let (orch, result) = runner.await.unwrap();
            assert!(result.is_ok());
            assert!(orch.degraded_start());
            assert_eq!(orch.phase(), Phase::Done);
            // Both applications were launched despite the dead service.
            assert_eq!(orch.supervisor().handles().len(), 2);
            assert!(orch.supervisor().live_executables().is_empty());
        }

        #[tokio::test]
        async fn shutdown_requests_each_process_exit_exactly_once() {
            let mut config = sleep_config();
            // Short-lived children: the fake tree records the exit
            // requests instead of delivering real signals.
            config.apps.primary.args = vec!["2".into()];
            config.apps.secondary.args = vec!["2".into()];
            config.service.port = 1;
            config.service.wait_timeout_secs = 600;
            config.service.poll_interval_ms = 50;

            let tree = Arc::new(FakeProcessTree::new());
            let token = CancellationToken::new();
            let run_token = token.clone();
            let mut orch = Orchestrator::new(
                config,
                two_monitor_desktop(),
                tree.clone(),
                run_token,
            )
            .with_skip_viewer(true);

            let runner = tokio::spawn(async move {
                let result = orch.run().await;
                (orch, result)
            });
            tokio::time::sleep(Duration::from_millis(300)).await;
            token.cancel();

            let (orch, result) = runner.await.unwrap();
            assert!(result.is_ok());
            assert_eq!(orch.phase(), Phase::Done);

            // Two launched processes, one exit request each.
            let requests = tree.exit_requests();
            assert_eq!(requests.len(), 2);
            let mut unique = requests.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), 2);
        }

        #[tokio::test]
        async fn shutdown_during_service_wait_terminates_everything() {
            let mut config = sleep_config();
            config.service.port = 1;
            config.service.wait_timeout_secs = 600;
            config.service.poll_interval_ms = 50;

            let token = CancellationToken::new();
            let run_token = token.clone();
            let mut orch = Orchestrator::new(
                config,
                two_monitor_desktop(),
                Arc::new(skipper_platform::native_process_tree()),
                run_token,
            )
            .with_skip_viewer(true);

            let runner = tokio::spawn(async move {
                let result = orch.run().await;
                (orch, result)
            });
            tokio::time::sleep(Duration::from_millis(300)).await;

            let started = tokio::time::Instant::now();
            token.cancel();
            let (orch, result) = runner.await.unwrap();

            assert!(result.is_ok());
            assert_eq!(orch.phase(), Phase::Done);
            // The probe aborted within a poll interval, not the full
            // ten-minute timeout.
            assert!(started.elapsed() < Duration::from_secs(10));
            assert!(orch.supervisor().live_executables().is_empty());
        }
    }
}
