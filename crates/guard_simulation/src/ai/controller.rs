//! Guard контроллер: perception-driven FSM
//!
//! Idle ⇄ Suspicious → Alerted
//!
//! - sight event: Idle/Suspicious → Alerted (detection report, таймеры отменены)
//! - hearing event: Idle/Suspicious → Suspicious (поворот к шуму, decay таймер)
//! - decay таймер: Suspicious → Idle (исходный facing, патруль дальше)
//! - tick: в Idle двигаемся по маршруту (distance-based goal check)
//!
//! Alerted выхода не имеет, терминальное событие только `destroy`.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::ai::config::GuardConfig;
use crate::ai::orientation::yaw_towards;
use crate::ai::patrol::{PatrolCursor, PatrolRoute, Waypoint};
use crate::ai::ports::GuardContext;
use crate::ai::timers::{DelayedTasks, TimerPurpose};

/// Состояния guard FSM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum GuardState {
    /// Патруль / стоим на посту
    #[default]
    Idle,
    /// Услышали шум, смотрим в его сторону
    Suspicious,
    /// Увидели игрока
    Alerted,
}

/// Guard Agent: состояние FSM + маршрут + отложенные задачи
///
/// Один компонент на guard'а; все мутации только через собственные
/// handler'ы и `tick`. Коллабораторы передаются в каждый вызов через
/// `GuardContext`.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct GuardController {
    state: GuardState,
    config: GuardConfig,
    route: PatrolRoute,
    cursor: PatrolCursor,
    home_facing: Quat,
    facing: Quat,
    timers: DelayedTasks,
    /// Latch: patrol advance запрещён пока проверяем шум
    suspicious: bool,
    /// Latch: patrol advance запрещён после обнаружения
    alerted: bool,
    /// Где слышали последний шум (для investigate)
    last_noise: Option<Vec3>,
    /// Facing изменён контроллером и ещё не отдан в Transform
    facing_dirty: bool,
    started: bool,
    destroyed: bool,
}

impl GuardController {
    pub fn new(config: GuardConfig, route: PatrolRoute, home_facing: Quat) -> Self {
        Self {
            state: GuardState::Idle,
            config,
            route,
            cursor: PatrolCursor::default(),
            home_facing,
            facing: home_facing,
            timers: DelayedTasks::new(),
            suspicious: false,
            alerted: false,
            last_noise: None,
            facing_dirty: false,
            started: false,
            destroyed: false,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn facing(&self) -> Quat {
        self.facing
    }

    pub fn home_facing(&self) -> Quat {
        self.home_facing
    }

    pub fn timers(&self) -> &DelayedTasks {
        &self.timers
    }

    pub fn is_suspicious(&self) -> bool {
        self.suspicious
    }

    pub fn is_alerted(&self) -> bool {
        self.alerted
    }

    pub fn has_begun_play(&self) -> bool {
        self.started
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Забрать facing, выставленный handler'ом после последнего sync
    ///
    /// Вращением в остальное время владеет engine, поэтому `None` пока
    /// контроллер сам не повернул guard'а (шум или decay).
    pub fn take_facing_update(&mut self) -> Option<Quat> {
        if !self.facing_dirty {
            return None;
        }
        self.facing_dirty = false;
        Some(self.facing)
    }

    /// Дошёл ли guard до текущей точки патруля (read-only проверка для `tick`)
    pub fn patrol_goal_reached(&self, position: Vec3) -> bool {
        if self.destroyed || self.suspicious || self.alerted || !self.config.patrol_enabled {
            return false;
        }

        self.current_waypoint()
            .is_some_and(|goal| position.distance(goal.position) < self.config.patrol_acceptance_radius)
    }

    /// Точка, к которой отдана последняя patrol команда
    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.cursor.current().and_then(|index| self.route.get(index))
    }

    /// Заменить маршрут (level load, до `begin_play`)
    pub fn set_route(&mut self, route: PatrolRoute) {
        self.route = route;
        self.cursor = PatrolCursor::default();
    }

    /// Старт агента: патрулирующий guard сразу идёт к первой точке
    pub fn begin_play(&mut self, ctx: &mut GuardContext<'_>) {
        if self.destroyed || self.started {
            return;
        }
        self.started = true;

        if self.config.patrol_enabled {
            if self.route.is_empty() {
                crate::log_warning("Guard: patrol enabled but route is empty, staying on post");
            } else {
                self.move_to_next_patrol_point(ctx);
            }
        }
    }

    /// Sight event: видим pawn → Alerted
    pub fn on_pawn_seen(&mut self, pawn: Option<Entity>, ctx: &mut GuardContext<'_>) {
        if self.destroyed {
            return;
        }

        let Some(pawn) = pawn else {
            crate::log("Guard: sight event without pawn, ignored");
            return;
        };

        let already_alerted = self.state == GuardState::Alerted;

        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            crate::log(&format!("Guard: sight event cancelled {} pending timer(s)", cancelled));
        }
        self.suspicious = false;
        self.alerted = true;
        self.last_noise = None;

        match ctx.navigation.as_deref_mut() {
            Some(navigation) if self.config.chase_on_sight => {
                navigation.move_to_actor(pawn, self.config.chase_acceptance_radius);
            }
            Some(navigation) => navigation.stop(),
            None => crate::log("Guard: no navigation actuator, skipping sight response movement"),
        }

        if !already_alerted || self.config.report_repeat_detections {
            crate::log_info(&format!("👁️ Guard spotted {:?} → mission failed", pawn));
            ctx.mission.report_detection(pawn, false);
        }

        self.set_state(GuardState::Alerted, ctx);
    }

    /// Hearing event: шум → Suspicious (в Alerted игнорируется)
    pub fn on_noise_heard(
        &mut self,
        instigator: Option<Entity>,
        guard_position: Vec3,
        location: Vec3,
        volume: f32,
        ctx: &mut GuardContext<'_>,
    ) {
        if self.destroyed {
            return;
        }

        if self.state == GuardState::Alerted {
            crate::log("Guard: noise ignored while Alerted");
            return;
        }

        crate::log(&format!(
            "🔊 Guard heard noise at {:?} (volume {:.2}, instigator {:?})",
            location, volume, instigator
        ));

        match yaw_towards(guard_position, location) {
            Some(facing) => {
                self.facing = facing;
                self.facing_dirty = true;
            }
            None => crate::log_warning("Guard: degenerate noise direction, facing unchanged"),
        }

        // cancel-then-set внутри arm: повторный шум продлевает suspicion
        self.timers.arm(TimerPurpose::ResetOrientation, self.config.suspicion_decay);

        if let Some(delay) = self.config.investigate_delay {
            self.last_noise = Some(location);
            self.timers.arm(TimerPurpose::InvestigateNoise, delay);
        }

        self.suspicious = true;
        self.set_state(GuardState::Suspicious, ctx);

        match ctx.navigation.as_deref_mut() {
            Some(navigation) => navigation.stop(),
            None => crate::log("Guard: no navigation actuator, skipping stop"),
        }
    }

    /// Продвинуть отложенные задачи и выполнить сработавшие
    pub fn advance_timers(&mut self, delta: Duration, ctx: &mut GuardContext<'_>) {
        if self.destroyed {
            return;
        }

        for purpose in self.timers.tick(delta) {
            match purpose {
                TimerPurpose::ResetOrientation => self.reset_orientation(ctx),
                TimerPurpose::InvestigateNoise => self.investigate_noise(ctx),
            }
        }
    }

    /// Per-tick patrol goal check (distance-based)
    ///
    /// Не работает пока выставлен suspicion/alert latch: guard не должен
    /// продолжать патруль посреди проверки шума.
    pub fn tick(&mut self, position: Vec3, ctx: &mut GuardContext<'_>) {
        if self.patrol_goal_reached(position) {
            self.move_to_next_patrol_point(ctx);
        }
    }

    /// Агент уничтожен: отменяем все задачи, дальше handler'ы: no-op
    pub fn destroy(&mut self) -> usize {
        if self.destroyed {
            return 0;
        }
        self.destroyed = true;
        self.last_noise = None;
        self.timers.cancel_all()
    }

    fn reset_orientation(&mut self, ctx: &mut GuardContext<'_>) {
        if self.state != GuardState::Suspicious {
            return;
        }

        self.facing = self.home_facing;
        self.facing_dirty = true;
        self.suspicious = false;
        self.last_noise = None;
        self.timers.cancel_purpose(TimerPurpose::InvestigateNoise);

        self.set_state(GuardState::Idle, ctx);

        // Закончили проверку: патрульный guard идёт к следующей точке
        if self.config.patrol_enabled {
            self.move_to_next_patrol_point(ctx);
        }
    }

    fn investigate_noise(&mut self, ctx: &mut GuardContext<'_>) {
        if self.state != GuardState::Suspicious {
            return;
        }
        let Some(noise) = self.last_noise else {
            return;
        };

        let jitter = self.config.investigate_jitter;
        let target = match ctx.rng.as_deref_mut() {
            Some(rng) if jitter > 0.0 => {
                let offset = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));
                noise + offset.clamp_length_max(1.0) * jitter
            }
            _ => noise,
        };

        match ctx.navigation.as_deref_mut() {
            Some(navigation) => {
                crate::log(&format!("Guard: investigating noise at {:?}", target));
                navigation.move_to_location(target);
            }
            None => crate::log("Guard: no navigation actuator, skipping investigate"),
        }
    }

    fn move_to_next_patrol_point(&mut self, ctx: &mut GuardContext<'_>) {
        let Some(index) = self.cursor.advance(&self.route) else {
            return;
        };
        let Some(waypoint) = self.route.get(index) else {
            return;
        };

        match ctx.navigation.as_deref_mut() {
            Some(navigation) => {
                crate::log(&format!("🚶 Guard patrol → {} at {:?}", waypoint.label, waypoint.position));
                navigation.move_to(waypoint);
            }
            None => crate::log("Guard: no navigation actuator, patrol point selected without movement"),
        }
    }

    /// Смена состояния; тот же state: no-op без notification
    fn set_state(&mut self, new_state: GuardState, ctx: &mut GuardContext<'_>) {
        if self.state == new_state {
            return;
        }

        crate::log_info(&format!("🛡️ Guard {:?} → {:?}", self.state, new_state));
        self.state = new_state;
        ctx.observer.state_changed(new_state);
    }
}
