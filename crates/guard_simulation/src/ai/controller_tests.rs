//! Tests for guard controller FSM.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::ai::{
        Detection, GuardConfig, GuardContext, GuardController, GuardState, NavigationActuator,
        PatrolRoute, TimerPurpose, Waypoint,
    };
    use crate::movement::NavigationStatus;

    #[derive(Debug, Clone, PartialEq)]
    enum NavCall {
        MoveTo(String),
        MoveToActor(Entity, f32),
        MoveToLocation(Vec3),
        Stop,
    }

    /// Recording fake для NavigationActuator
    #[derive(Default)]
    struct RecordingNavigation {
        calls: Vec<NavCall>,
    }

    impl NavigationActuator for RecordingNavigation {
        fn move_to(&mut self, waypoint: &Waypoint) {
            self.calls.push(NavCall::MoveTo(waypoint.label.clone()));
        }

        fn move_to_actor(&mut self, actor: Entity, acceptance_radius: f32) {
            self.calls.push(NavCall::MoveToActor(actor, acceptance_radius));
        }

        fn move_to_location(&mut self, location: Vec3) {
            self.calls.push(NavCall::MoveToLocation(location));
        }

        fn stop(&mut self) {
            self.calls.push(NavCall::Stop);
        }

        fn status(&self) -> NavigationStatus {
            NavigationStatus::Idle
        }
    }

    const GUARD_POS: Vec3 = Vec3::ZERO;

    fn three_point_route() -> PatrolRoute {
        PatrolRoute::new(vec![
            Waypoint::new("TargetPoint0", Vec3::new(500.0, 0.0, 0.0)),
            Waypoint::new("TargetPoint1", Vec3::new(500.0, 0.0, 500.0)),
            Waypoint::new("TargetPoint2", Vec3::new(0.0, 0.0, 500.0)),
        ])
    }

    /// Guard + recording коллабораторы
    struct Harness {
        guard: GuardController,
        navigation: RecordingNavigation,
        detections: Vec<Detection>,
        states: Vec<GuardState>,
        rng: ChaCha8Rng,
        attach_navigation: bool,
    }

    impl Harness {
        fn new(config: GuardConfig) -> Self {
            Self {
                guard: GuardController::new(config, three_point_route(), Quat::IDENTITY),
                navigation: RecordingNavigation::default(),
                detections: Vec::new(),
                states: Vec::new(),
                rng: ChaCha8Rng::seed_from_u64(42),
                attach_navigation: true,
            }
        }

        fn without_navigation(mut self) -> Self {
            self.attach_navigation = false;
            self
        }

        fn run(&mut self, f: impl FnOnce(&mut GuardController, &mut GuardContext<'_>)) {
            let navigation = if self.attach_navigation {
                Some(&mut self.navigation as &mut dyn NavigationActuator)
            } else {
                None
            };

            let mut ctx = GuardContext::new(&mut self.detections, &mut self.states)
                .with_navigation(navigation)
                .with_rng(Some(&mut self.rng as &mut dyn RngCore));

            f(&mut self.guard, &mut ctx);
        }

        fn begin(&mut self) {
            self.run(|guard, ctx| guard.begin_play(ctx));
        }

        fn hear(&mut self, location: Vec3) {
            self.run(|guard, ctx| guard.on_noise_heard(None, GUARD_POS, location, 1.0, ctx));
        }

        fn see(&mut self, pawn: Option<Entity>) {
            self.run(|guard, ctx| guard.on_pawn_seen(pawn, ctx));
        }

        fn advance(&mut self, secs: f32) {
            self.run(|guard, ctx| guard.advance_timers(Duration::from_secs_f32(secs), ctx));
        }

        fn tick_at(&mut self, position: Vec3) {
            self.run(|guard, ctx| guard.tick(position, ctx));
        }

        fn last_call(&self) -> Option<&NavCall> {
            self.navigation.calls.last()
        }
    }

    fn move_to(label: &str) -> NavCall {
        NavCall::MoveTo(label.to_string())
    }

    #[test]
    fn test_begin_play_moves_to_first_waypoint() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();

        assert_eq!(harness.navigation.calls, vec![move_to("TargetPoint0")]);
        assert_eq!(harness.guard.state(), GuardState::Idle);
        assert!(harness.states.is_empty()); // Idle → Idle не notification

        // Повторный begin_play ничего не делает
        harness.begin();
        assert_eq!(harness.navigation.calls.len(), 1);
    }

    #[test]
    fn test_noise_scenario_three_waypoint_guard() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();

        let noise = Vec3::new(300.0, 120.0, 0.0);
        harness.hear(noise);

        // Facing к шуму, pitch/roll обнулены
        let facing = harness.guard.facing();
        assert!((facing * Vec3::NEG_Z).abs_diff_eq(Vec3::X, 1e-5));
        assert!((facing * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-5));

        assert_eq!(harness.last_call(), Some(&NavCall::Stop));
        assert_eq!(harness.guard.state(), GuardState::Suspicious);
        assert_eq!(harness.guard.timers().len(), 1);
        assert!(harness.guard.timers().pending(TimerPurpose::ResetOrientation).is_some());
        assert_eq!(harness.states, vec![GuardState::Suspicious]);
    }

    #[test]
    fn test_repeated_noise_keeps_single_decay_timer() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();

        for i in 0..6 {
            harness.hear(Vec3::new(100.0 + i as f32 * 10.0, 0.0, -50.0));
            harness.advance(2.0); // Меньше decay (3.0): suspicion продлевается

            assert_eq!(harness.guard.state(), GuardState::Suspicious);
            assert_eq!(harness.guard.timers().len(), 1);
        }

        // Notification только на реальный переход
        assert_eq!(harness.states, vec![GuardState::Suspicious]);
    }

    #[test]
    fn test_sight_from_idle_reports_once() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();

        let pawn = Entity::from_raw(11);
        harness.see(Some(pawn));
        harness.see(Some(pawn));

        assert_eq!(harness.guard.state(), GuardState::Alerted);
        assert_eq!(
            harness.detections,
            vec![Detection {
                instigator: pawn,
                success: false,
            }]
        );
        assert_eq!(harness.states, vec![GuardState::Alerted]);
        assert_eq!(harness.last_call(), Some(&NavCall::Stop));
    }

    #[test]
    fn test_repeat_detections_flag() {
        let config = GuardConfig {
            report_repeat_detections: true,
            ..Default::default()
        };
        let mut harness = Harness::new(config);

        let pawn = Entity::from_raw(11);
        harness.see(Some(pawn));
        harness.see(Some(pawn));

        assert_eq!(harness.detections.len(), 2);
        assert_eq!(harness.states, vec![GuardState::Alerted]);
    }

    #[test]
    fn test_sight_while_suspicious_cancels_decay() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();
        harness.hear(Vec3::new(0.0, 0.0, -200.0));
        assert_eq!(harness.guard.timers().len(), 1);

        let pawn = Entity::from_raw(3);
        harness.see(Some(pawn));

        assert_eq!(harness.guard.state(), GuardState::Alerted);
        assert!(harness.guard.timers().is_empty());
        assert_eq!(harness.detections.len(), 1);
        assert!(!harness.detections[0].success);

        // Отменённый decay не вернёт guard'а в Idle
        harness.advance(10.0);
        assert_eq!(harness.guard.state(), GuardState::Alerted);
        assert_eq!(harness.states, vec![GuardState::Suspicious, GuardState::Alerted]);
    }

    #[test]
    fn test_noise_ignored_while_alerted() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.see(Some(Entity::from_raw(1)));
        let facing_before = harness.guard.facing();
        let calls_before = harness.navigation.calls.len();

        harness.hear(Vec3::new(-400.0, 0.0, 0.0));

        assert_eq!(harness.guard.state(), GuardState::Alerted);
        assert!(harness.guard.timers().is_empty());
        assert_eq!(harness.guard.facing(), facing_before);
        assert_eq!(harness.navigation.calls.len(), calls_before);
    }

    #[test]
    fn test_decay_returns_to_idle_and_resumes_patrol() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();
        harness.hear(Vec3::new(0.0, 0.0, 300.0));
        assert_ne!(harness.guard.facing(), harness.guard.home_facing());

        harness.advance(2.9);
        assert_eq!(harness.guard.state(), GuardState::Suspicious);

        harness.advance(0.2);
        assert_eq!(harness.guard.state(), GuardState::Idle);
        assert_eq!(harness.guard.facing(), harness.guard.home_facing());
        assert!(!harness.guard.is_suspicious());
        assert!(harness.guard.timers().is_empty());

        // Следующая точка, не та же самая
        assert_eq!(harness.last_call(), Some(&move_to("TargetPoint1")));
        assert_eq!(harness.states, vec![GuardState::Suspicious, GuardState::Idle]);
    }

    #[test]
    fn test_facing_update_only_after_noise_and_decay() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();

        // Патруль и goal check не трогают вращение
        harness.tick_at(Vec3::new(480.0, 0.0, 0.0));
        assert_eq!(harness.guard.take_facing_update(), None);

        harness.hear(Vec3::new(-300.0, 0.0, 0.0));
        let facing = harness.guard.take_facing_update();
        assert_eq!(facing, Some(harness.guard.facing()));
        assert_eq!(harness.guard.take_facing_update(), None);

        harness.advance(3.1);
        assert_eq!(harness.guard.take_facing_update(), Some(harness.guard.home_facing()));

        harness.see(Some(Entity::from_raw(3)));
        assert_eq!(harness.guard.take_facing_update(), None);
    }

    #[test]
    fn test_patrol_goal_reached_respects_latches() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();
        let at_goal = Vec3::new(480.0, 0.0, 0.0);

        assert!(harness.guard.patrol_goal_reached(at_goal));
        assert!(!harness.guard.patrol_goal_reached(Vec3::ZERO));

        harness.hear(Vec3::new(-300.0, 0.0, 0.0));
        assert!(!harness.guard.patrol_goal_reached(at_goal));
    }

    #[test]
    fn test_patrol_cycles_by_distance() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();

        // Далеко от цели: ничего
        harness.tick_at(Vec3::new(-1000.0, 0.0, 0.0));
        assert_eq!(harness.navigation.calls.len(), 1);

        // Внутри 90 units: следующая точка
        harness.tick_at(Vec3::new(450.0, 0.0, 10.0));
        harness.tick_at(Vec3::new(500.0, 0.0, 480.0));
        harness.tick_at(Vec3::new(10.0, 0.0, 500.0));

        assert_eq!(
            harness.navigation.calls,
            vec![
                move_to("TargetPoint0"),
                move_to("TargetPoint1"),
                move_to("TargetPoint2"),
                move_to("TargetPoint0"),
            ]
        );
    }

    #[test]
    fn test_patrol_suppressed_while_suspicious() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();
        harness.hear(Vec3::new(0.0, 0.0, -100.0));
        let calls_before = harness.navigation.calls.len();

        // Стоим прямо на точке патруля, но latch выставлен
        harness.tick_at(Vec3::new(500.0, 0.0, 0.0));
        assert_eq!(harness.navigation.calls.len(), calls_before);
    }

    #[test]
    fn test_destroy_cancels_pending_decay() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.begin();
        harness.hear(Vec3::new(0.0, 0.0, -100.0));

        assert_eq!(harness.guard.destroy(), 1);
        assert!(harness.guard.is_destroyed());
        assert!(harness.guard.timers().is_empty());

        harness.advance(10.0);
        harness.hear(Vec3::new(50.0, 0.0, 0.0));
        harness.see(Some(Entity::from_raw(2)));

        // Никаких callback'ов после destroy
        assert_eq!(harness.guard.state(), GuardState::Suspicious);
        assert_eq!(harness.states, vec![GuardState::Suspicious]);
        assert!(harness.detections.is_empty());
        assert_eq!(harness.guard.destroy(), 0);
    }

    #[test]
    fn test_missing_navigation_keeps_state_machine() {
        let mut harness = Harness::new(GuardConfig::default()).without_navigation();
        harness.begin();
        harness.hear(Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(harness.guard.state(), GuardState::Suspicious);

        harness.advance(3.5);
        assert_eq!(harness.guard.state(), GuardState::Idle);

        harness.see(Some(Entity::from_raw(5)));
        assert_eq!(harness.guard.state(), GuardState::Alerted);
        assert_eq!(harness.detections.len(), 1);
        assert!(harness.navigation.calls.is_empty());
    }

    #[test]
    fn test_degenerate_noise_direction_skips_facing() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.hear(GUARD_POS + Vec3::new(0.0, 80.0, 0.0));

        assert_eq!(harness.guard.facing(), Quat::IDENTITY);
        assert_eq!(harness.guard.state(), GuardState::Suspicious);
        assert_eq!(harness.guard.timers().len(), 1);
    }

    #[test]
    fn test_sight_without_pawn_ignored() {
        let mut harness = Harness::new(GuardConfig::default());
        harness.see(None);

        assert_eq!(harness.guard.state(), GuardState::Idle);
        assert!(harness.detections.is_empty());
        assert!(harness.states.is_empty());
    }

    #[test]
    fn test_chase_on_sight() {
        let config = GuardConfig {
            chase_on_sight: true,
            ..Default::default()
        };
        let mut harness = Harness::new(config);
        let pawn = Entity::from_raw(9);

        harness.see(Some(pawn));
        assert_eq!(harness.last_call(), Some(&NavCall::MoveToActor(pawn, 100.0)));

        // В Alerted погоня переотдаётся (pawn мог сместиться), detection: нет
        let other = Entity::from_raw(10);
        harness.see(Some(other));
        assert_eq!(harness.last_call(), Some(&NavCall::MoveToActor(other, 100.0)));
        assert_eq!(harness.detections.len(), 1);
    }

    #[test]
    fn test_investigate_noise_then_decay() {
        let config = GuardConfig {
            investigate_delay: Some(1.0),
            ..Default::default()
        };
        let mut harness = Harness::new(config);
        harness.begin();

        let noise = Vec3::new(-200.0, 0.0, 40.0);
        harness.hear(noise);
        assert_eq!(harness.guard.timers().len(), 2);

        harness.advance(1.1);
        assert_eq!(harness.last_call(), Some(&NavCall::MoveToLocation(noise)));
        assert_eq!(harness.guard.state(), GuardState::Suspicious);

        harness.advance(2.0);
        assert_eq!(harness.guard.state(), GuardState::Idle);
        assert_eq!(harness.last_call(), Some(&move_to("TargetPoint1")));
    }

    #[test]
    fn test_investigate_jitter_stays_in_radius() {
        let config = GuardConfig {
            investigate_delay: Some(0.5),
            investigate_jitter: 30.0,
            ..Default::default()
        };
        let mut harness = Harness::new(config);

        let noise = Vec3::new(200.0, 0.0, 200.0);
        harness.hear(noise);
        harness.advance(0.6);

        let Some(NavCall::MoveToLocation(target)) = harness.last_call().cloned() else {
            panic!("expected investigate move, got {:?}", harness.last_call());
        };
        assert_eq!(target.y, noise.y);
        assert!(target.distance(noise) <= 30.0 + 1e-3);
    }

    #[test]
    fn test_sight_cancels_investigation() {
        let config = GuardConfig {
            investigate_delay: Some(1.0),
            ..Default::default()
        };
        let mut harness = Harness::new(config);
        harness.hear(Vec3::new(0.0, 0.0, -300.0));
        harness.see(Some(Entity::from_raw(4)));

        harness.advance(5.0);
        assert!(!harness
            .navigation
            .calls
            .iter()
            .any(|call| matches!(call, NavCall::MoveToLocation(_))));
    }

    #[test]
    fn test_patrol_disabled_guard_stays_on_post() {
        let config = GuardConfig {
            patrol_enabled: false,
            ..Default::default()
        };
        let mut harness = Harness::new(config);
        harness.begin();
        assert!(harness.navigation.calls.is_empty());

        harness.hear(Vec3::new(0.0, 0.0, 100.0));
        harness.advance(3.5);

        assert_eq!(harness.guard.state(), GuardState::Idle);
        assert_eq!(harness.navigation.calls, vec![NavCall::Stop]);
    }

    #[test]
    fn test_empty_route_never_patrols() {
        let mut guard = GuardController::new(GuardConfig::default(), PatrolRoute::default(), Quat::IDENTITY);
        let mut navigation = RecordingNavigation::default();
        let mut detections: Vec<Detection> = Vec::new();
        let mut states: Vec<GuardState> = Vec::new();

        let mut ctx = GuardContext::new(&mut detections, &mut states)
            .with_navigation(Some(&mut navigation as &mut dyn NavigationActuator));
        guard.begin_play(&mut ctx);
        guard.tick(Vec3::ZERO, &mut ctx);
        drop(ctx);

        assert!(navigation.calls.is_empty());
        assert!(guard.current_waypoint().is_none());
    }
}
