//! Outbox: вызов контроллера с ECS коллабораторами + отправка событий

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rand::RngCore;
use rand_chacha::ChaCha8Rng;

use crate::ai::{
    Detection, GuardContext, GuardState, GuardStateChanged, MissionCompleted, NavigationActuator,
};
use crate::movement::{EcsNavigation, MovementCommand, NavigationStatus};

/// Наружные события guard'а (state change + mission sink)
#[derive(SystemParam)]
pub struct GuardEventWriters<'w> {
    state_changes: EventWriter<'w, GuardStateChanged>,
    missions: EventWriter<'w, MissionCompleted>,
}

/// Буфер notification'ов одного вызова контроллера
#[derive(Default)]
pub struct GuardOutbox {
    detections: Vec<Detection>,
    state_changes: Vec<GuardState>,
}

impl GuardOutbox {
    /// Собрать `GuardContext` для guard'а, выполнить `run`, отправить события
    ///
    /// Guard без MovementCommand работает как state-only машина.
    pub fn dispatch(
        guard: Entity,
        command: Option<&mut MovementCommand>,
        status: Option<&NavigationStatus>,
        rng: Option<&mut ChaCha8Rng>,
        writers: &mut GuardEventWriters,
        run: impl FnOnce(&mut GuardContext<'_>),
    ) {
        let mut outbox = Self::default();

        {
            let status = status.copied().unwrap_or_default();
            let mut navigation = command.map(|command| EcsNavigation::new(command, status));

            let mut ctx = GuardContext::new(&mut outbox.detections, &mut outbox.state_changes)
                .with_navigation(navigation.as_mut().map(|n| n as &mut dyn NavigationActuator))
                .with_rng(rng.map(|rng| rng as &mut dyn RngCore));

            run(&mut ctx);
        }

        outbox.flush(guard, writers);
    }

    fn flush(self, guard: Entity, writers: &mut GuardEventWriters) {
        for state in self.state_changes {
            writers.state_changes.write(GuardStateChanged { guard, state });
        }

        for detection in self.detections {
            writers.missions.write(MissionCompleted {
                guard,
                instigator: detection.instigator,
                success: detection.success,
            });
        }
    }
}
