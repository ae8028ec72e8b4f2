//! Guard lifecycle: level route resolution, begin play, despawn cleanup

use bevy::prelude::*;

use crate::ai::systems::{GuardEventWriters, GuardOutbox};
use crate::ai::{GuardConfig, GuardController, PatrolPoint, PatrolRoute};
use crate::movement::{MovementCommand, NavigationStatus};

/// Marker: маршрут guard'а собрать из PatrolPoint entities уровня
///
/// Снимается после одноразового resolve в `resolve_patrol_routes`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GuardPatrolFromLevel;

/// Bundle guard'а с ECS navigation actuator'ом
///
/// home facing = rotation из spawn transform.
pub fn guard_bundle(config: GuardConfig, route: PatrolRoute, transform: Transform) -> impl Bundle {
    (
        GuardController::new(config, route, transform.rotation),
        transform,
        MovementCommand::Idle,
        NavigationStatus::Idle,
    )
}

/// Система: собрать маршрут из PatrolPoint markers (level load)
pub fn resolve_patrol_routes(
    mut commands: Commands,
    mut guards: Query<(Entity, &mut GuardController), With<GuardPatrolFromLevel>>,
    points: Query<(&PatrolPoint, &Transform, Option<&Name>)>,
) {
    if guards.is_empty() {
        return;
    }

    for (entity, mut controller) in guards.iter_mut() {
        let route = PatrolRoute::from_markers(
            points
                .iter()
                .map(|(point, transform, name)| (point, transform.translation, name.map(Name::as_str))),
        );

        crate::log(&format!(
            "Guard {:?}: resolved patrol route with {} waypoint(s) from level",
            entity,
            route.len()
        ));

        controller.set_route(route);
        commands.entity(entity).remove::<GuardPatrolFromLevel>();
    }
}

/// Система: begin play для новых guard'ов
pub fn begin_guard_play(
    mut guards: Query<
        (
            Entity,
            &mut GuardController,
            Option<&mut MovementCommand>,
            Option<&NavigationStatus>,
        ),
        Without<GuardPatrolFromLevel>,
    >,
    mut writers: GuardEventWriters,
) {
    for (entity, mut controller, mut command, status) in guards.iter_mut() {
        if controller.has_begun_play() || controller.is_destroyed() {
            continue;
        }

        GuardOutbox::dispatch(
            entity,
            command.as_deref_mut(),
            status,
            None,
            &mut writers,
            |ctx| controller.begin_play(ctx),
        );
    }
}

/// Observer: guard удаляется (despawn / remove) → отменить все pending таймеры
pub fn cancel_guard_timers_on_remove(
    trigger: Trigger<OnRemove, GuardController>,
    mut guards: Query<&mut GuardController>,
) {
    let entity = trigger.target();

    let Ok(mut controller) = guards.get_mut(entity) else {
        return;
    };

    let cancelled = controller.destroy();
    if cancelled > 0 {
        crate::log(&format!("Guard {:?} removed: cancelled {} pending timer(s)", entity, cancelled));
    }
}
