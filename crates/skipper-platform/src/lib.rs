//! Platform capability boundary for skipper.
//!
//! The orchestrator never talks to the OS directly; it goes through the
//! [`desktop::Desktop`] trait for window and display operations and the
//! [`process_tree::ProcessTree`] trait for pid ancestry and termination.
//! Backends live behind the traits so the launch-and-place logic can be
//! exercised against in-memory fakes.

pub mod desktop;
pub mod monitors;
pub mod process_tree;

pub use desktop::{native_desktop, Desktop, TopLevelWindow, WindowId};
pub use monitors::{Monitor, MonitorRegistry};
pub use process_tree::{native_process_tree, ProcessTree, SysinfoProcessTree};

pub type Result<T> = std::result::Result<T, skipper_common::PlatformError>;
