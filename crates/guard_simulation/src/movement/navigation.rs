//! EcsNavigation: NavigationActuator поверх MovementCommand компонента

use bevy::prelude::*;

use crate::ai::{NavigationActuator, Waypoint};
use crate::movement::{MovementCommand, NavigationStatus};

/// Адаптер: команды контроллера → MovementCommand, статус ← NavigationStatus
pub struct EcsNavigation<'a> {
    command: &'a mut MovementCommand,
    status: NavigationStatus,
}

impl<'a> EcsNavigation<'a> {
    pub fn new(command: &'a mut MovementCommand, status: NavigationStatus) -> Self {
        Self { command, status }
    }

    /// Пишем только изменившуюся команду, иначе engine получит повторный path request
    fn issue(&mut self, command: MovementCommand) {
        if *self.command != command {
            *self.command = command;
        }
    }
}

impl NavigationActuator for EcsNavigation<'_> {
    fn move_to(&mut self, waypoint: &Waypoint) {
        self.issue(MovementCommand::MoveToWaypoint {
            label: waypoint.label.clone(),
            target: waypoint.position,
        });
    }

    fn move_to_actor(&mut self, actor: Entity, acceptance_radius: f32) {
        self.issue(MovementCommand::FollowEntity {
            target: actor,
            acceptance_radius,
        });
    }

    fn move_to_location(&mut self, location: Vec3) {
        self.issue(MovementCommand::MoveToPosition { target: location });
    }

    fn stop(&mut self) {
        self.issue(MovementCommand::Stop);
    }

    fn status(&self) -> NavigationStatus {
        self.status
    }
}
