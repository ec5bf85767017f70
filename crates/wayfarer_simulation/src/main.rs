//! Headless симуляция Wayfarer
//!
//! Патрульный, бродяга и "игрок": патрульный переключается в pursuit,
//! когда игрок подходит ближе 8м.

use bevy::prelude::*;
use wayfarer_simulation::physics::{rapier_body_bundle, RapierVelocitySyncPlugin};
use wayfarer_simulation::{
    create_headless_app, log_error, log_info, spawn_navigator, BehaviorController, NavConfig,
    NavConfigError, PursueEntity,
};

const DETECTION_RADIUS: f32 = 8.0;

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    // Velocity патрульного зеркалится в Rapier тело (для хоста с RapierPhysicsPlugin)
    app.add_plugins(RapierVelocitySyncPlugin);
    log_info(&format!("Starting Wayfarer headless simulation (seed: {})", seed));

    let (patroller, player) = match spawn_scene(&mut app) {
        Ok(entities) => entities,
        Err(err) => {
            log_error(&format!("Failed to spawn navigators: {}", err));
            return;
        }
    };

    // 1000 тиков (~16.7 sec при 60Hz)
    for tick in 0..1000 {
        // Игрок медленно идёт к патрульному
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            transform.translation.x -= 0.03;
        }

        detect_player(&mut app, patroller, player);
        app.update();

        if tick % 100 == 0 {
            let world = app.world();
            if let (Some(controller), Some(transform)) = (
                world.get::<BehaviorController>(patroller),
                world.get::<Transform>(patroller),
            ) {
                log_info(&format!(
                    "Tick {}: patroller at {:.2?}, target {:.2?}, pursuit {:?}",
                    tick,
                    transform.translation,
                    controller.target_position(),
                    controller.pursuit()
                ));
            }
        }
    }

    log_info("Simulation complete!");
}

/// Патрульный + бродяга + игрок (цель для pursuit)
fn spawn_scene(app: &mut App) -> Result<(Entity, Entity), NavConfigError> {
    let patrol_config = NavConfig::patrolling(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 10.0),
    ])
    .with_nav_time(1.0)
    .with_pursuit(3.0, 15.0);
    let wander_config = NavConfig::wandering(Vec3::new(-20.0, 0.0, 0.0), 6.0).with_nav_time(2.0);

    let (patroller, player) = {
        let mut commands = app.world_mut().commands();
        let patroller = spawn_navigator(&mut commands, Vec3::ZERO, patrol_config)?;
        commands.entity(patroller).insert(rapier_body_bundle());
        spawn_navigator(&mut commands, Vec3::new(-20.0, 0.0, 0.0), wander_config)?;
        let player = commands.spawn(Transform::from_xyz(30.0, 0.0, 5.0)).id();
        (patroller, player)
    };
    app.world_mut().flush();

    Ok((patroller, player))
}

/// Примитивная "detection" логика снаружи навигации: радиус без LOS
fn detect_player(app: &mut App, patroller: Entity, player: Entity) {
    let world = app.world();
    let (Some(patroller_transform), Some(player_transform), Some(controller)) = (
        world.get::<Transform>(patroller),
        world.get::<Transform>(player),
        world.get::<BehaviorController>(patroller),
    ) else {
        return;
    };

    let in_range = patroller_transform
        .translation
        .distance(player_transform.translation)
        <= DETECTION_RADIUS;

    if in_range && !controller.pursuit().is_pursuing() {
        app.world_mut().send_event(PursueEntity {
            pursuer: patroller,
            target: player,
        });
    }
}
