//! Коллабораторы guard контроллера (navigation, mission sink, state observer)
//!
//! Контроллер ничем из этого не владеет: всё приходит через `GuardContext`
//! на время одного вызова. ECS адаптеры: в `crate::movement` и `ai::systems`,
//! в тестах: recording fakes.

use bevy::prelude::*;
use rand::RngCore;

use crate::ai::patrol::Waypoint;
use crate::ai::GuardState;
use crate::movement::NavigationStatus;

/// Исполнитель движения (engine pathfinding)
pub trait NavigationActuator {
    fn move_to(&mut self, waypoint: &Waypoint);
    fn move_to_actor(&mut self, actor: Entity, acceptance_radius: f32);
    fn move_to_location(&mut self, location: Vec3);
    fn stop(&mut self);
    fn status(&self) -> NavigationStatus;
}

/// Получатель обнаружения игрока (mission complete / fail)
pub trait MissionSink {
    fn report_detection(&mut self, instigator: Entity, success: bool);
}

/// Наблюдатель смены состояния (replication / animation / UI)
pub trait StateObserver {
    fn state_changed(&mut self, state: GuardState);
}

/// Один репорт обнаружения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub instigator: Entity,
    pub success: bool,
}

impl MissionSink for Vec<Detection> {
    fn report_detection(&mut self, instigator: Entity, success: bool) {
        self.push(Detection { instigator, success });
    }
}

impl StateObserver for Vec<GuardState> {
    fn state_changed(&mut self, state: GuardState) {
        self.push(state);
    }
}

/// Коллабораторы на время одного вызова контроллера
///
/// `navigation: None`: guard без actuator'а: переходы работают, движения нет.
/// `rng: None`: investigate без разброса.
pub struct GuardContext<'a> {
    pub navigation: Option<&'a mut dyn NavigationActuator>,
    pub mission: &'a mut dyn MissionSink,
    pub observer: &'a mut dyn StateObserver,
    pub rng: Option<&'a mut dyn RngCore>,
}

impl<'a> GuardContext<'a> {
    pub fn new(mission: &'a mut dyn MissionSink, observer: &'a mut dyn StateObserver) -> Self {
        Self {
            navigation: None,
            mission,
            observer,
            rng: None,
        }
    }

    pub fn with_navigation(mut self, navigation: Option<&'a mut dyn NavigationActuator>) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn with_rng(mut self, rng: Option<&'a mut dyn RngCore>) -> Self {
        self.rng = rng;
        self
    }
}
