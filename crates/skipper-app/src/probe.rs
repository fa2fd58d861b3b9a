//! TCP readiness probing.
//!
//! One short-lived connect attempt per poll; nothing is sent or read.
//! Individual connect failures are expected while the service boots and
//! never surface as errors. Only the elapsed timeout produces `false`.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One readiness wait against `host:port`. Transient: consumed by a
/// single [`wait_for_port`] call.
#[derive(Debug, Clone)]
pub struct ReadinessCheck {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Poll until the endpoint accepts a TCP connection or `timeout`
/// elapses. Returns `true` on the first successful connect. A
/// cancelled token aborts the wait within one poll interval.
pub async fn wait_for_port(check: &ReadinessCheck, token: &CancellationToken) -> bool {
    let deadline = Instant::now() + check.timeout;
    let addr = (check.host.clone(), check.port);
    let mut attempt = 0u32;

    loop {
        if token.is_cancelled() {
            debug!("readiness probe cancelled");
            return false;
        }

        attempt += 1;
        let connect = tokio::time::timeout(check.poll_interval, TcpStream::connect(addr.clone()));
        tokio::select! {
            _ = token.cancelled() => {
                debug!("readiness probe cancelled");
                return false;
            }
            result = connect => {
                if matches!(result, Ok(Ok(_))) {
                    debug!("{}:{} accepted a connection on attempt {attempt}", check.host, check.port);
                    return true;
                }
            }
        }

        if Instant::now() >= deadline {
            return false;
        }

        tokio::select! {
            _ = token.cancelled() => return false,
            _ = tokio::time::sleep(check.poll_interval) => {}
        }

        if Instant::now() >= deadline {
            return false;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
