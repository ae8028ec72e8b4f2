//! Guard Simulation Core
//!
//! ECS-симуляция guard AI на Bevy 0.16 (strategic layer)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (guard FSM, patrol, suspicion/alert)
//! - Engine = tactical layer (perception, pathfinding, physics, rendering)
//!
//! Engine пишет PerceptionEvent и NavigationStatus, читает MovementCommand,
//! GuardStateChanged и MissionCompleted.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod logger;
pub mod movement;

// Re-export базовых типов для удобства
pub use ai::{
    guard_bundle, GuardConfig, GuardController, GuardPlugin, GuardState, GuardStateChanged,
    MissionCompleted, PatrolPoint, PatrolRoute, PerceptionEvent, Waypoint,
};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use movement::{MovementCommand, NavigationStatus};

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins(GuardPlugin);

        // Детерминистичный RNG (seed по умолчанию), если хост не вставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Наблюдаемое состояние одного guard'а (для сравнения прогонов)
#[derive(Debug, Clone, PartialEq)]
pub struct GuardSnapshot {
    pub guard: Entity,
    pub state: GuardState,
    pub facing: Quat,
    pub waypoint: Option<String>,
    pub command: Option<MovementCommand>,
    pub pending_timers: usize,
}

/// Snapshot всех guard'ов мира, отсортированный по Entity
///
/// Два прогона с одним seed и одинаковым вводом обязаны дать равные snapshot'ы.
pub fn guard_snapshot(world: &mut World) -> Vec<GuardSnapshot> {
    let mut query = world.query::<(Entity, &GuardController, Option<&MovementCommand>)>();

    let mut snapshot: Vec<_> = query
        .iter(world)
        .map(|(guard, controller, command)| GuardSnapshot {
            guard,
            state: controller.state(),
            facing: controller.facing(),
            waypoint: controller.current_waypoint().map(|waypoint| waypoint.label.clone()),
            command: command.cloned(),
            pending_timers: controller.timers().len(),
        })
        .collect();

    snapshot.sort_by_key(|entry| entry.guard);
    snapshot
}
