pub mod capability;
pub mod controller;
pub mod safety_monitor;

pub use controller::{CommandOutcome, DashboardController};
pub use safety_monitor::{SafetyMonitor, SafetyStatus, SafetyTransition};
