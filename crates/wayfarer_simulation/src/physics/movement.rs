//! Kinematic mover для навигирующих акторов
//!
//! Архитектура:
//! - Velocity считает навигация (steering), mover только применяет её
//! - Headless режим: прямая интеграция velocity → Transform + плоский пол
//! - С Rapier: velocity синхронизируется в `bevy_rapier3d::Velocity`
//!   KinematicVelocityBased тела, коллизии решает Rapier

use bevy::prelude::*;
use bevy_rapier3d::plugin::PhysicsSet;
use bevy_rapier3d::prelude::{Collider, RigidBody, Velocity};

/// Внешний physics mover: двигает актора и решает контакт с землёй
pub trait PhysicsMover {
    /// Применить velocity за `delta_secs` (коллизии / пол — забота mover'а)
    fn apply_velocity(&mut self, translation: &mut Vec3, velocity: Vec3, delta_secs: f32);
    /// Стоит ли актор на земле после последнего шага
    fn is_on_ground(&self) -> bool;
}

/// Kinematic тело актора
///
/// `velocity` — transient, пересчитывается каждый тик навигацией.
/// Вертикальная компонента переносится между тиками (gravity accumulation),
/// обнуляется при приземлении.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    pub velocity: Vec3,
    pub grounded: bool,
    /// Высота пола для headless ground check
    pub floor_height: f32,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            grounded: true,
            floor_height: 0.0,
        }
    }
}

impl PhysicsMover for KinematicBody {
    fn apply_velocity(&mut self, translation: &mut Vec3, velocity: Vec3, delta_secs: f32) {
        self.velocity = velocity;
        *translation += velocity * delta_secs;

        // Плоский пол: ниже floor_height не проваливаемся
        if translation.y <= self.floor_height {
            translation.y = self.floor_height;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    fn is_on_ground(&self) -> bool {
        self.grounded
    }
}

/// Система интеграции velocity → Transform (headless режим, без Rapier)
pub fn integrate_kinematic_bodies(
    mut query: Query<(&mut KinematicBody, &mut Transform)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (mut body, mut transform) in query.iter_mut() {
        let velocity = body.velocity;
        body.apply_velocity(&mut transform.translation, velocity, delta);
    }
}

/// Синхронизация KinematicBody.velocity → Rapier Velocity
///
/// Для хостов где актор — Rapier KinematicVelocityBased тело.
pub fn sync_velocity_to_rapier(mut query: Query<(&KinematicBody, &mut Velocity)>) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Rapier компоненты для навигирующего актора (capsule, kinematic)
pub fn rapier_body_bundle() -> (RigidBody, Collider, Velocity) {
    (
        RigidBody::KinematicVelocityBased,
        Collider::capsule_y(0.5, 0.4), // Высота 1.0m (0.5 + 0.5), радиус 0.4m
        Velocity::default(),
    )
}

/// Plugin: синхронизация velocity в Rapier
///
/// Добавляется хостом, который сам подключает RapierPhysicsPlugin.
/// Headless интеграция (`integrate_kinematic_bodies`) тогда не нужна —
/// см. `NavigationPlugin::headless`.
pub struct RapierVelocitySyncPlugin;

impl Plugin for RapierVelocitySyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            sync_velocity_to_rapier
                .after(crate::navigation::NavigationSet)
                .before(PhysicsSet::SyncBackend),
        );
    }
}
