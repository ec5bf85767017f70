//! Wayfarer Simulation Core
//!
//! Навигация акторов на Bevy 0.16: выбор цели (behavior + pursuit override)
//! и steering (waypoint → velocity).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = решения (куда идти, как двигаться)
//! - Хост = path planning (waypoints) и физика (коллизии, пол)

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod logger;
pub mod navigation;
pub mod physics;

// Re-export базовых типов для удобства
pub use logger::{log, log_error, log_info, log_warning};
pub use navigation::{
    spawn_navigator, BehaviorChanged, BehaviorController, NavBehavior, NavConfig, NavConfigError,
    NavigationAgent, NavigationPlugin, NavigationSet, PursueEntity, PursuitState, StopPursuit,
    TargetReached, WaypointSource,
};
pub use physics::KinematicBody;

/// Частота симуляции (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Детерминистичный RNG (seed по умолчанию, если хост не поставил свой)
            .init_resource::<DeterministicRng>()
            .add_plugins(NavigationPlugin::default());
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Wander points и случайный старт патруля берутся отсюда —
/// одинаковый seed даёт одинаковые маршруты.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную ровно на один fixed tick за `app.update()`,
/// поэтому прогон не зависит от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
