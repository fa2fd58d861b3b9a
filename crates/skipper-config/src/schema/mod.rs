//! Configuration schema types for skipper.
//!
//! All structs use `serde(default)` so partial configs work correctly;
//! missing fields are filled with defaults matching the documented
//! launcher behavior.

mod apps;
mod placement;
mod service;
mod system;
mod viewer;

pub use apps::*;
pub use placement::*;
pub use service::*;
pub use system::*;
pub use viewer::*;

use serde::{Deserialize, Serialize};

/// Root configuration for skipper.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkipperConfig {
    pub apps: AppsConfig,
    pub service: ServiceConfig,
    pub viewer: ViewerConfig,
    pub placement: PlacementConfig,
    pub shutdown: ShutdownConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
