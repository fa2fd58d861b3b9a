//! Service readiness configuration types.

use serde::{Deserialize, Serialize};

/// The TCP service the secondary application is expected to expose, and
/// how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// URL the viewer opens. Empty means derive `http://{host}:{port}/`.
    pub url: String,
    /// Total time to wait for the port before continuing degraded.
    pub wait_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Extra delay between the port opening and the viewer launch, for
    /// services that accept connections before they can serve pages.
    pub post_ready_delay_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            url: String::new(),
            wait_timeout_secs: 30,
            poll_interval_ms: 500,
            post_ready_delay_ms: 1000,
        }
    }
}

impl ServiceConfig {
    /// The URL the viewer should open.
    pub fn viewer_url(&self) -> String {
        if self.url.is_empty() {
            format!("http://{}:{}/", self.host, self.port)
        } else {
            self.url.clone()
        }
    }
}
