pub mod errors;
pub mod types;

pub use errors::{ConfigError, PlatformError, SkipperError, SupervisorError};
pub use types::{ProcessId, ProcessState, Rect};

pub type Result<T> = std::result::Result<T, SkipperError>;
