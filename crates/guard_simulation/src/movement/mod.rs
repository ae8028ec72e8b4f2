//! Movement domain: команды перемещения для engine navigation
//!
//! Содержит:
//! - MovementCommand (high-level intent, исполняет engine pathfinding)
//! - NavigationStatus (статус движения, репортит engine)
//! - EcsNavigation (NavigationActuator поверх MovementCommand)

pub mod components;
pub mod navigation;

// Re-export all components
pub use components::*;
pub use navigation::EcsNavigation;
