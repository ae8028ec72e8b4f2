//! Guard AI module
//!
//! Perception-driven FSM guard'а (Idle / Suspicious / Alerted):
//! patrol по маршруту, проверка шума с decay таймером, обнаружение игрока.
//!
//! Core (`GuardController`): обычная Rust state machine, коллабораторы через
//! traits (`ports`). ECS слой (`systems`) подключает её к Bevy events/components.

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod events;
pub mod orientation;
pub mod patrol;
pub mod ports;
pub mod systems;
pub mod timers;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod controller_tests;

// Re-export основных типов
pub use config::{GuardConfig, GuardConfigError};
pub use controller::{GuardController, GuardState};
pub use events::{GuardStateChanged, MissionCompleted, PerceptionEvent};
pub use orientation::yaw_towards;
pub use patrol::{PatrolCursor, PatrolPoint, PatrolRoute, Waypoint};
pub use ports::{Detection, GuardContext, MissionSink, NavigationActuator, StateObserver};
pub use systems::{guard_bundle, GuardPatrolFromLevel};
pub use timers::{DelayedTasks, TaskHandle, TimerPurpose};

/// Guard AI Plugin
///
/// Регистрирует guard системы в FixedUpdate.
/// Порядок выполнения:
/// 1. resolve_patrol_routes: маршруты из PatrolPoint markers (level load)
/// 2. begin_guard_play: первый patrol leg для новых guard'ов
/// 3. handle_perception_events: sight/hearing → FSM transitions
/// 4. tick_guard_timers: decay / investigate callbacks
/// 5. patrol_goal_check: per-tick distance check (после perception!)
/// 6. sync_guard_facing: facing → Transform
pub struct GuardPlugin;

impl Plugin for GuardPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionEvent>()
            .add_event::<GuardStateChanged>()
            .add_event::<MissionCompleted>();

        app.register_type::<GuardState>().register_type::<PatrolPoint>();

        // Despawn guard'а → pending таймеры отменяются
        app.add_observer(systems::cancel_guard_timers_on_remove);

        app.add_systems(
            FixedUpdate,
            (
                systems::resolve_patrol_routes,
                systems::begin_guard_play,
                systems::handle_perception_events,
                systems::tick_guard_timers,
                systems::patrol_goal_check,
                systems::sync_guard_facing,
            )
                .chain(), // Последовательное выполнение: perception до patrol check
        );
    }
}
