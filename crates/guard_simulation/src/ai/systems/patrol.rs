//! Guard timers + per-tick patrol goal check

use bevy::prelude::*;

use crate::ai::systems::{GuardEventWriters, GuardOutbox};
use crate::ai::GuardController;
use crate::movement::{MovementCommand, NavigationStatus};
use crate::DeterministicRng;

/// Система: продвинуть отложенные задачи guard'ов (decay, investigate)
///
/// Таймеры тикают на том же FixedUpdate, что и остальная guard логика,
/// так что callback никогда не пересекается с handler'ом того же guard'а.
pub fn tick_guard_timers(
    time: Res<Time<Fixed>>,
    mut rng: Option<ResMut<DeterministicRng>>,
    mut guards: Query<(
        Entity,
        &mut GuardController,
        Option<&mut MovementCommand>,
        Option<&NavigationStatus>,
    )>,
    mut writers: GuardEventWriters,
) {
    let delta = time.delta();

    for (entity, mut controller, mut command, status) in guards.iter_mut() {
        if controller.timers().is_empty() {
            continue;
        }

        let guard_rng = rng.as_deref_mut().map(|deterministic| &mut deterministic.rng);

        GuardOutbox::dispatch(
            entity,
            command.as_deref_mut(),
            status,
            guard_rng,
            &mut writers,
            |ctx| controller.advance_timers(delta, ctx),
        );
    }
}

/// Система: patrol goal check (distance-based)
///
/// Guard дошёл до текущей точки (ближе patrol_acceptance_radius) → следующая точка.
pub fn patrol_goal_check(
    mut guards: Query<(
        Entity,
        &mut GuardController,
        &Transform,
        Option<&mut MovementCommand>,
        Option<&NavigationStatus>,
    )>,
    mut writers: GuardEventWriters,
) {
    for (entity, mut controller, transform, mut command, status) in guards.iter_mut() {
        let position = transform.translation;

        // DerefMut только при реальном advance: иначе Changed<GuardController>
        // срабатывал бы каждый frame патруля
        if !controller.patrol_goal_reached(position) {
            continue;
        }

        GuardOutbox::dispatch(
            entity,
            command.as_deref_mut(),
            status,
            None,
            &mut writers,
            |ctx| controller.tick(position, ctx),
        );
    }
}

/// Система: facing контроллера → Transform.rotation
///
/// Пишем только facing, выставленный handler'ом (шум / decay). В остальное
/// время rotation принадлежит engine (SetActorRotation аналог).
pub fn sync_guard_facing(
    mut guards: Query<(&mut GuardController, &mut Transform), Changed<GuardController>>,
) {
    for (mut controller, mut transform) in guards.iter_mut() {
        let Some(facing) = controller.bypass_change_detection().take_facing_update() else {
            continue;
        };
        if transform.rotation != facing {
            transform.rotation = facing;
        }
    }
}
