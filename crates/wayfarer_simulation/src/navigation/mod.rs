//! Navigation module — steering и выбор цели для навигирующих акторов
//!
//! Default behavior (Idle/Direct/Wandering/Patrolling) + pursuit override.
//! Path planning снаружи: ядро потребляет waypoints через `WaypointSource`.

use bevy::prelude::*;

pub mod behavior;
pub mod config;
pub mod error;
pub mod events;
pub mod steering;
pub mod systems;
pub mod timer;
pub mod waypoints;


// Re-export основных типов
pub use behavior::{random_wander_point, BehaviorController, PursuitAction, PursuitState, ENGAGE_DEAD_BAND};
pub use config::{NavBehavior, NavConfig};
pub use error::NavConfigError;
pub use events::{BehaviorChanged, PursueEntity, StopPursuit, TargetReached};
pub use steering::{compute_velocity, SteeringOutput};
pub use systems::spawn_navigator;
pub use timer::RetargetTimer;
pub use waypoints::{NavigationAgent, WaypointSource};

/// Все navigation системы (для ordering снаружи)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationSet;

/// Navigation Plugin
///
/// Регистрирует navigation системы в FixedUpdate одной цепочкой:
/// стимулы → таймеры → pursuit tick → steering → mover → прогресс пути.
///
/// `headless = true` — velocity интегрируется здесь же (плоский пол).
/// `headless = false` — velocity применяет внешний mover (Rapier, движок).
pub struct NavigationPlugin {
    pub headless: bool,
}

impl Default for NavigationPlugin {
    fn default() -> Self {
        Self { headless: true }
    }
}

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        let headless = self.headless;

        app.add_event::<PursueEntity>()
            .add_event::<StopPursuit>()
            .add_event::<TargetReached>()
            .add_event::<BehaviorChanged>()
            .register_type::<NavConfig>()
            .register_type::<BehaviorController>()
            .register_type::<crate::physics::KinematicBody>()
            .add_systems(
                FixedUpdate,
                (
                    systems::activate_navigators,
                    systems::handle_navigation_stimuli,
                    systems::handle_target_reached,
                    systems::tick_retarget_timers,
                    systems::resolve_navigation_targets,
                    systems::steer_navigators,
                    crate::physics::integrate_kinematic_bodies.run_if(move || headless),
                    systems::track_waypoint_progress,
                )
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(NavigationSet),
            );
    }
}
