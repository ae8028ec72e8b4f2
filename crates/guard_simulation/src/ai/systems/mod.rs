//! Guard AI systems (ECS ↔ GuardController)

pub mod lifecycle;
pub mod patrol;
pub mod perception;

pub mod outbox;

// Re-export all systems
pub use lifecycle::*;
pub use patrol::*;
pub use perception::*;

pub use outbox::{GuardEventWriters, GuardOutbox};
