//! Navigation systems — тик актора.
//!
//! Порядок (chain, FixedUpdate):
//! 1. activate_navigators — отложенная активация (сцена готова, spawn применён)
//! 2. handle_navigation_stimuli — PursueEntity / StopPursuit / BehaviorChanged
//! 3. handle_target_reached — TargetReached → on_target_reached
//! 4. tick_retarget_timers — истёк таймер → новый wander point / patrol stop
//! 5. resolve_navigation_targets — pursuit override (BehaviorController::tick)
//! 6. steer_navigators — waypoint → velocity + facing
//! 7. integrate_kinematic_bodies — headless mover (опционально)
//! 8. track_waypoint_progress — продвижение пути, TargetReached

use bevy::prelude::*;

use super::behavior::{BehaviorController, PursuitAction};
use super::config::NavConfig;
use super::error::NavConfigError;
use super::events::{BehaviorChanged, PursueEntity, StopPursuit, TargetReached};
use super::steering::{apply_gravity, compute_velocity};
use super::waypoints::{NavigationAgent, WaypointSource};
use crate::physics::{KinematicBody, PhysicsMover};
use crate::DeterministicRng;

/// Spawn навигирующего актора
///
/// Конфиг валидируется ДО spawn (пустой patrol route → ошибка, не паника в runtime).
/// Активация (первая target) — на следующем тике, когда entity уже в мире.
pub fn spawn_navigator(
    commands: &mut Commands,
    position: Vec3,
    config: NavConfig,
) -> Result<Entity, NavConfigError> {
    config.validate()?;

    let controller = BehaviorController::new(&config, position);
    let agent = NavigationAgent::new(config.target_desired_distance);
    let body = KinematicBody {
        floor_height: position.y,
        ..default()
    };

    let entity = commands
        .spawn((
            Transform::from_translation(position),
            config,
            controller,
            agent,
            body,
        ))
        .id();

    crate::log(&format!("Navigator spawned: {:?} at {:?}", entity, position));
    Ok(entity)
}

/// Система: двухфазная инициализация навигаторов
pub fn activate_navigators(
    mut query: Query<(&NavConfig, &mut BehaviorController, &mut NavigationAgent)>,
    mut rng: ResMut<DeterministicRng>,
) {
    for (config, mut controller, mut agent) in query.iter_mut() {
        if controller.is_activated() {
            continue;
        }
        controller.activate(config, &mut rng.rng, &mut *agent);
    }
}

/// Система: внешние стимулы навигации
///
/// Порядок внутри тика фиксирован: BehaviorChanged → PursueEntity → StopPursuit.
/// Pursue и Stop для одного актора в одном тике = pursuit НЕ идёт (stop побеждает
/// независимо от порядка отправки).
pub fn handle_navigation_stimuli(
    mut pursue_events: EventReader<PursueEntity>,
    mut stop_events: EventReader<StopPursuit>,
    mut behavior_events: EventReader<BehaviorChanged>,
    mut query: Query<(&mut BehaviorController, &mut NavigationAgent)>,
) {
    for event in behavior_events.read() {
        let Ok((mut controller, _)) = query.get_mut(event.entity) else {
            continue;
        };
        crate::log(&format!(
            "Navigator {:?}: behavior {:?} → {:?}",
            event.entity,
            controller.behavior(),
            event.behavior
        ));
        controller.set_behavior(event.behavior);
    }

    for event in pursue_events.read() {
        let Ok((mut controller, _)) = query.get_mut(event.pursuer) else {
            continue;
        };
        controller.pursue(event.target);
    }

    for event in stop_events.read() {
        let Ok((mut controller, mut agent)) = query.get_mut(event.pursuer) else {
            continue;
        };
        controller.end_pursuit(&mut *agent);
    }
}

/// Система: waypoint source достиг target
pub fn handle_target_reached(
    mut reached_events: EventReader<TargetReached>,
    mut query: Query<&mut BehaviorController>,
) {
    for event in reached_events.read() {
        if let Ok(mut controller) = query.get_mut(event.entity) {
            controller.on_target_reached();
        }
    }
}

/// Система: retarget timers
pub fn tick_retarget_timers(
    mut query: Query<(&NavConfig, &mut BehaviorController, &mut NavigationAgent)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
) {
    let delta = time.delta();

    for (config, mut controller, mut agent) in query.iter_mut() {
        if controller.advance_timer(delta) {
            controller.on_retarget_timer_expired(config, &mut rng.rng, &mut *agent);
        }
    }
}

/// Система: pursuit override поверх default behavior
///
/// Пропавший pursuit entity (despawn) = конец pursuit.
pub fn resolve_navigation_targets(
    mut query: Query<(
        Entity,
        &Transform,
        &NavConfig,
        &mut BehaviorController,
        &mut NavigationAgent,
    )>,
    positions: Query<&Transform>,
) {
    for (entity, transform, config, mut controller, mut agent) in query.iter_mut() {
        let Some(pursued) = controller.pursuit().entity() else {
            continue;
        };

        let pursuit_position = positions.get(pursued).ok().map(|t| t.translation);
        let action = controller.tick(transform.translation, pursuit_position, config, &mut *agent);

        if action == PursuitAction::Ended && pursuit_position.is_none() {
            crate::log(&format!(
                "Navigator {:?}: pursuit target {:?} is gone",
                entity, pursued
            ));
        }
    }
}

/// Система: steering (waypoint → velocity)
///
/// Путь закончен → горизонтальная скорость 0, calculator не вызываем.
pub fn steer_navigators(
    mut query: Query<(&NavConfig, &NavigationAgent, &mut KinematicBody, &mut Transform)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (config, agent, mut body, mut transform) in query.iter_mut() {
        let on_ground = body.is_on_ground();

        if agent.is_finished() {
            let vertical = apply_gravity(body.velocity.y, on_ground, delta, config);
            body.velocity = Vec3::new(0.0, vertical, 0.0);
            continue;
        }

        let output = compute_velocity(
            transform.translation,
            agent.next_waypoint(),
            on_ground,
            delta,
            body.velocity.y,
            config,
        );

        body.velocity = output.velocity();
        if let Some(facing) = output.facing {
            transform.rotation = facing;
        }
    }
}

/// Система: продвижение пути + одноразовое TargetReached
pub fn track_waypoint_progress(
    mut query: Query<(Entity, &Transform, &mut NavigationAgent)>,
    mut reached_events: EventWriter<TargetReached>,
) {
    for (entity, transform, mut agent) in query.iter_mut() {
        if agent.update_progress(transform.translation) {
            reached_events.write(TargetReached { entity });
        }
    }
}
