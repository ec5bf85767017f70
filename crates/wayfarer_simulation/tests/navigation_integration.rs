//! Navigation integration test
//!
//! Headless App, 60Hz FixedUpdate, один fixed tick на app.update().
//!
//! Проверяем:
//! - Patrol цикл 0 → 10 → 0 через reached + timer
//! - Wandering не выходит из зоны
//! - Pursuit: подход на engage_distance, выход с возвратом к goal
//! - Despawn / StopPursuit заканчивают pursuit
//! - Прыжок к waypoint над головой и приземление

use bevy::prelude::*;
use wayfarer_simulation::*;

/// Helper: spawn навигатора и применить commands
fn spawn(app: &mut App, position: Vec3, config: NavConfig) -> Entity {
    let entity = {
        let mut commands = app.world_mut().commands();
        spawn_navigator(&mut commands, position, config).expect("valid navigation config")
    };
    app.world_mut().flush();
    entity
}

fn controller(app: &App, entity: Entity) -> &BehaviorController {
    app.world()
        .get::<BehaviorController>(entity)
        .expect("navigator has BehaviorController")
}

fn position(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .expect("entity has Transform")
        .translation
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

#[test]
fn test_patrol_route_cycles_between_stops() {
    let mut app = create_headless_app(42);
    let config = NavConfig::patrolling(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]).with_nav_time(0.25);
    let patroller = spawn(&mut app, Vec3::ZERO, config);

    let mut targets: Vec<Vec3> = Vec::new();
    let mut max_x = f32::MIN;

    for _ in 0..600 {
        app.update();

        let target = controller(&app, patroller).target_position();
        if targets.last() != Some(&target) {
            targets.push(target);
        }
        max_x = max_x.max(position(&app, patroller).x);
    }

    assert!(targets.len() >= 3, "targets: {:?}", targets);
    assert_eq!(targets[0], Vec3::ZERO);
    assert_eq!(targets[1], Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(targets[2], Vec3::ZERO);
    assert!(max_x >= 9.4, "patroller never reached the far stop (max x {})", max_x);
}

#[test]
fn test_wanderer_stays_in_zone() {
    let mut app = create_headless_app(7);
    let anchor = Vec3::new(5.0, 0.0, -5.0);
    let config = NavConfig::wandering(anchor, 4.0).with_nav_time(0.5);
    let wanderer = spawn(&mut app, anchor, config);

    let mut distinct_targets = 0;
    let mut last_target = None;

    for _ in 0..900 {
        app.update();
        if !controller(&app, wanderer).is_activated() {
            continue;
        }

        let target = controller(&app, wanderer).target_position();
        let horizontal = Vec2::new(target.x - anchor.x, target.z - anchor.z).length();
        assert!(horizontal <= 4.0 + 1e-4, "target {:?} outside zone", target);
        assert_eq!(target.y, anchor.y);

        let pos = position(&app, wanderer);
        let pos_horizontal = Vec2::new(pos.x - anchor.x, pos.z - anchor.z).length();
        assert!(pos_horizontal <= 4.5, "wanderer left the zone: {:?}", pos);

        if last_target != Some(target) {
            distinct_targets += 1;
            last_target = Some(target);
        }
    }

    // 15 сек при retarget каждые 0.5 сек
    assert!(distinct_targets >= 10, "only {} wander targets", distinct_targets);
}

#[test]
fn test_pursuit_engages_and_restores_goal() {
    let mut app = create_headless_app(42);
    let config = NavConfig::patrolling(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)])
        .with_nav_time(100.0)
        .with_pursuit(3.0, 20.0);
    let guard = spawn(&mut app, Vec3::ZERO, config);
    let intruder = app.world_mut().spawn(Transform::from_xyz(8.0, 0.0, 0.0)).id();

    run_ticks(&mut app, 5);
    let t0 = controller(&app, guard).target_position();
    assert_eq!(t0, Vec3::ZERO);

    app.world_mut().send_event(PursueEntity {
        pursuer: guard,
        target: intruder,
    });
    run_ticks(&mut app, 180);

    let guard_controller = controller(&app, guard);
    assert_eq!(guard_controller.pursuit(), PursuitState::Pursuing(intruder));
    assert!(guard_controller.timer().is_paused());
    assert_eq!(guard_controller.base_movement_goal(), t0);

    let distance = position(&app, guard).distance(position(&app, intruder));
    assert!(
        (2.0..=3.5).contains(&distance),
        "guard should hold engage distance, got {}",
        distance
    );

    // Intruder убегает дальше pursuit_distance
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(intruder) {
        transform.translation = Vec3::new(60.0, 0.0, 0.0);
    }
    app.update();

    let guard_controller = controller(&app, guard);
    assert_eq!(guard_controller.pursuit(), PursuitState::Idle);
    assert_eq!(guard_controller.target_position(), t0);
    assert!(!guard_controller.timer().is_paused());
}

#[test]
fn test_despawned_pursuit_target_ends_pursuit() {
    let mut app = create_headless_app(42);
    let start_goal = Vec3::new(3.0, 0.0, 3.0);
    let guard = spawn(&mut app, Vec3::ZERO, NavConfig::direct(start_goal).with_pursuit(2.0, 30.0));
    let intruder = app.world_mut().spawn(Transform::from_xyz(10.0, 0.0, 0.0)).id();

    run_ticks(&mut app, 2);
    app.world_mut().send_event(PursueEntity {
        pursuer: guard,
        target: intruder,
    });
    run_ticks(&mut app, 10);
    assert!(controller(&app, guard).pursuit().is_pursuing());

    app.world_mut().despawn(intruder);
    app.update();

    let guard_controller = controller(&app, guard);
    assert_eq!(guard_controller.pursuit(), PursuitState::Idle);
    assert_eq!(guard_controller.target_position(), start_goal);
}

#[test]
fn test_stop_pursuit_event_restores_goal() {
    let mut app = create_headless_app(42);
    let start_goal = Vec3::new(-6.0, 0.0, 0.0);
    let guard = spawn(&mut app, Vec3::ZERO, NavConfig::direct(start_goal));
    let intruder = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 8.0)).id();

    run_ticks(&mut app, 2);
    app.world_mut().send_event(PursueEntity {
        pursuer: guard,
        target: intruder,
    });
    run_ticks(&mut app, 3);
    assert_eq!(controller(&app, guard).target_position(), Vec3::new(0.0, 0.0, 8.0));

    app.world_mut().send_event(StopPursuit { pursuer: guard });
    app.update();

    assert_eq!(controller(&app, guard).pursuit(), PursuitState::Idle);
    assert_eq!(controller(&app, guard).target_position(), start_goal);
}

#[test]
fn test_behavior_change_event_switches_mode() {
    let mut app = create_headless_app(42);
    let config = NavConfig {
        anchor_point: Vec3::new(0.0, 0.0, 0.0),
        wander_range: 3.0,
        nav_time: 0.2,
        ..NavConfig::default()
    };
    let actor = spawn(&mut app, Vec3::ZERO, config);

    run_ticks(&mut app, 30);
    assert_eq!(controller(&app, actor).behavior(), NavBehavior::Idle);
    assert!(!controller(&app, actor).timer().is_running());

    app.world_mut().send_event(BehaviorChanged {
        entity: actor,
        behavior: NavBehavior::Wandering,
    });

    let mut distinct_targets = 0;
    let mut last_target = controller(&app, actor).target_position();
    for _ in 0..600 {
        app.update();
        let target = controller(&app, actor).target_position();
        if target != last_target {
            distinct_targets += 1;
            last_target = target;
        }
    }

    assert_eq!(controller(&app, actor).behavior(), NavBehavior::Wandering);
    // 10 сек при retarget каждые 0.2 сек
    assert!(distinct_targets >= 20, "only {} wander targets", distinct_targets);
}

#[test]
fn test_idle_actor_returns_to_spawn_after_pursuit() {
    let mut app = create_headless_app(42);
    let spawn_point = Vec3::new(20.0, 0.0, 20.0);
    let guard = spawn(&mut app, spawn_point, NavConfig::default().with_pursuit(3.0, 20.0));
    let intruder = app.world_mut().spawn(Transform::from_xyz(28.0, 0.0, 20.0)).id();

    run_ticks(&mut app, 2);
    app.world_mut().send_event(PursueEntity {
        pursuer: guard,
        target: intruder,
    });
    run_ticks(&mut app, 60);
    assert!(controller(&app, guard).pursuit().is_pursuing());
    assert!(position(&app, guard).x > 21.0);

    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(intruder) {
        transform.translation = Vec3::new(100.0, 0.0, 20.0);
    }
    run_ticks(&mut app, 180);

    let guard_controller = controller(&app, guard);
    assert_eq!(guard_controller.pursuit(), PursuitState::Idle);
    assert_eq!(guard_controller.target_position(), spawn_point);
    let pos = position(&app, guard);
    assert!(pos.distance(spawn_point) <= 0.6, "guard stopped at {:?}", pos);
}

#[test]
fn test_stop_wins_over_pursue_in_same_tick() {
    let mut app = create_headless_app(42);
    let start_goal = Vec3::new(-6.0, 0.0, 0.0);
    let guard = spawn(&mut app, Vec3::ZERO, NavConfig::direct(start_goal));
    let intruder = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 8.0)).id();
    run_ticks(&mut app, 2);

    // Stop → Pursue
    app.world_mut().send_event(StopPursuit { pursuer: guard });
    app.world_mut().send_event(PursueEntity {
        pursuer: guard,
        target: intruder,
    });
    app.update();
    assert_eq!(controller(&app, guard).pursuit(), PursuitState::Idle);
    assert_eq!(controller(&app, guard).target_position(), start_goal);

    // Pursue → Stop
    app.world_mut().send_event(PursueEntity {
        pursuer: guard,
        target: intruder,
    });
    app.world_mut().send_event(StopPursuit { pursuer: guard });
    app.update();
    assert_eq!(controller(&app, guard).pursuit(), PursuitState::Idle);
    assert_eq!(controller(&app, guard).target_position(), start_goal);
}

#[test]
fn test_direct_actor_walks_to_goal_and_stops() {
    let mut app = create_headless_app(42);
    let goal = Vec3::new(0.0, 0.0, -6.0);
    let walker = spawn(&mut app, Vec3::ZERO, NavConfig::direct(goal).with_speed(4.0));

    run_ticks(&mut app, 180);

    let pos = position(&app, walker);
    assert!(pos.distance(goal) <= 0.6, "walker stopped at {:?}", pos);

    let body = app.world().get::<KinematicBody>(walker).expect("walker has KinematicBody");
    assert_eq!(body.velocity, Vec3::ZERO);
    assert!(app
        .world()
        .get::<NavigationAgent>(walker)
        .expect("walker has NavigationAgent")
        .is_finished());
}

#[test]
fn test_jump_to_waypoint_overhead_and_land() {
    let mut app = create_headless_app(42);
    let ledge = Vec3::new(0.0, 3.0, 0.0);
    let jumper = spawn(&mut app, Vec3::ZERO, NavConfig::direct(ledge).with_jump(8.0));

    let mut max_y = 0.0_f32;
    for _ in 0..240 {
        app.update();
        max_y = max_y.max(position(&app, jumper).y);
    }

    assert!(max_y > 2.0, "jumper never left the ground (max y {})", max_y);

    let pos = position(&app, jumper);
    let body = app.world().get::<KinematicBody>(jumper).expect("jumper has KinematicBody");
    assert_eq!(pos.y, 0.0);
    assert!(body.grounded);
    assert_eq!(body.velocity.y, 0.0);
}

#[test]
fn test_spawn_rejects_empty_patrol_route() {
    let mut app = create_headless_app(42);
    let mut commands = app.world_mut().commands();

    let result = spawn_navigator(&mut commands, Vec3::ZERO, NavConfig::patrolling(Vec::new()));

    assert!(matches!(result, Err(NavConfigError::EmptyPatrolRoute)));
}

#[test]
fn test_rapier_velocity_follows_navigation() {
    use bevy_rapier3d::prelude::Velocity;
    use wayfarer_simulation::physics::{rapier_body_bundle, RapierVelocitySyncPlugin};

    let mut app = create_headless_app(42);
    app.add_plugins(RapierVelocitySyncPlugin);
    let walker = spawn(&mut app, Vec3::ZERO, NavConfig::direct(Vec3::new(10.0, 0.0, 0.0)));
    app.world_mut().entity_mut(walker).insert(rapier_body_bundle());

    run_ticks(&mut app, 10);

    let body = app.world().get::<KinematicBody>(walker).expect("walker has KinematicBody");
    let rapier_velocity = app.world().get::<Velocity>(walker).expect("walker has rapier Velocity");
    assert_eq!(rapier_velocity.linvel, body.velocity);
    assert!((rapier_velocity.linvel.x - 5.0).abs() < 1e-4);
}
