//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod heartbeat;
pub mod shutdown;

pub use heartbeat::{HeartbeatConfig, InstanceHeartbeat};
pub use shutdown::{shutdown_signal, ShutdownController};
