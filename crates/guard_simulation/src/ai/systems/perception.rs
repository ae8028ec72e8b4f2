//! Perception → guard FSM

use bevy::prelude::*;

use crate::ai::systems::{GuardEventWriters, GuardOutbox};
use crate::ai::{GuardController, PerceptionEvent};
use crate::movement::{MovementCommand, NavigationStatus};

/// Система: PerceptionEvent → GuardController handlers
///
/// Запускается ДО patrol_goal_check: sight event этого frame сразу
/// выставляет alert latch и подавляет patrol advance этого же frame.
pub fn handle_perception_events(
    mut perception_events: EventReader<PerceptionEvent>,
    mut guards: Query<(
        &mut GuardController,
        &Transform,
        Option<&mut MovementCommand>,
        Option<&NavigationStatus>,
    )>,
    mut writers: GuardEventWriters,
) {
    for event in perception_events.read() {
        let observer = event.observer();

        let Ok((mut controller, transform, mut command, status)) = guards.get_mut(observer) else {
            crate::log_warning(&format!(
                "Perception event for {:?} which is not a guard (despawned?), ignored",
                observer
            ));
            continue;
        };

        let guard_position = transform.translation;

        GuardOutbox::dispatch(
            observer,
            command.as_deref_mut(),
            status,
            None,
            &mut writers,
            |ctx| match event {
                PerceptionEvent::PawnSeen { pawn, .. } => controller.on_pawn_seen(*pawn, ctx),
                PerceptionEvent::NoiseHeard {
                    instigator,
                    location,
                    volume,
                    ..
                } => controller.on_noise_heard(*instigator, guard_position, *location, *volume, ctx),
            },
        );
    }
}
