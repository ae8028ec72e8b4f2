//! Headless симуляция guard'а
//!
//! Патрульный guard с тремя точками: шум → Suspicious → decay → Idle,
//! потом игрок в поле зрения → Alerted.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use guard_simulation::{
    create_headless_app, guard_bundle, GuardConfig, GuardStateChanged, MissionCompleted,
    MovementCommand, PatrolRoute, PerceptionEvent, SimulationPlugin, Waypoint,
};

fn main() {
    let seed = 42;
    println!("Starting guard headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));

    let route = PatrolRoute::new(vec![
        Waypoint::new("TargetPoint0", Vec3::new(500.0, 0.0, 0.0)),
        Waypoint::new("TargetPoint1", Vec3::new(500.0, 0.0, 500.0)),
        Waypoint::new("TargetPoint2", Vec3::new(0.0, 0.0, 500.0)),
    ]);

    let guard = app
        .world_mut()
        .spawn(guard_bundle(GuardConfig::default(), route, Transform::default()))
        .id();
    let player = app.world_mut().spawn(Transform::from_xyz(-300.0, 0.0, 0.0)).id();

    let mut state_cursor = app.world().resource::<Events<GuardStateChanged>>().get_cursor();
    let mut mission_cursor = app.world().resource::<Events<MissionCompleted>>().get_cursor();

    for tick in 0..600 {
        match tick {
            60 => {
                app.world_mut().send_event(PerceptionEvent::NoiseHeard {
                    observer: guard,
                    instigator: Some(player),
                    location: Vec3::new(-300.0, 0.0, 0.0),
                    volume: 1.0,
                });
            }
            480 => {
                app.world_mut().send_event(PerceptionEvent::PawnSeen {
                    observer: guard,
                    pawn: Some(player),
                });
            }
            _ => {}
        }

        app.update();

        for changed in state_cursor.read(app.world().resource::<Events<GuardStateChanged>>()) {
            println!("Tick {}: guard {:?} → {:?}", tick, changed.guard, changed.state);
        }
        for mission in mission_cursor.read(app.world().resource::<Events<MissionCompleted>>()) {
            println!(
                "Tick {}: mission complete (instigator {:?}, success: {})",
                tick, mission.instigator, mission.success
            );
        }

        if tick % 100 == 0 {
            if let Some(command) = app.world().get::<MovementCommand>(guard) {
                println!("Tick {}: movement {:?}", tick, command);
            }
        }
    }

    println!("Simulation complete!");
}
