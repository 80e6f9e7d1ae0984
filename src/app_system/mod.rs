//! System orchestration, startup, and shutdown logic.

pub mod delivery_system;
pub mod telemetry;

pub use delivery_system::*;
pub use telemetry::*;
