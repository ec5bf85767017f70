//! Movement calculator: waypoint → velocity + facing.
//!
//! Чистая функция без скрытого состояния: вертикальная скорость с прошлого
//! тика передаётся явно, одинаковый вход → бит-в-бит одинаковый выход.

use bevy::prelude::*;

use super::config::NavConfig;

/// Минимальная y-компонента направления для прыжка (почти вертикальный подъём)
pub const JUMP_MIN_VERTICAL: f32 = 0.9;
/// Максимальное горизонтальное отклонение (|x|, |z|) для прыжка
pub const JUMP_MAX_HORIZONTAL: f32 = 0.01;

/// Результат расчёта движения на один тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringOutput {
    /// Горизонтальная скорость (y = 0)
    pub horizontal: Vec3,
    /// Вертикальная скорость (gravity / jump)
    pub vertical: f32,
    /// Поворот "смотрим на waypoint". None если waypoint совпадает с позицией
    pub facing: Option<Quat>,
}

impl SteeringOutput {
    pub fn velocity(&self) -> Vec3 {
        Vec3::new(self.horizontal.x, self.vertical, self.horizontal.z)
    }
}

/// Рассчитать скорость к следующему waypoint
///
/// - Waypoint проецируется на высоту актора (heading только в XZ)
/// - В воздухе: `vertical -= gravity * delta`
/// - На земле + waypoint почти строго сверху + can_jump: `vertical = jump_velocity`
/// - Иначе vertical как был (обнуляет mover при приземлении)
pub fn compute_velocity(
    current_position: Vec3,
    next_waypoint: Vec3,
    on_ground: bool,
    delta_secs: f32,
    carried_vertical: f32,
    config: &NavConfig,
) -> SteeringOutput {
    let flattened = Vec3::new(next_waypoint.x, current_position.y, next_waypoint.z);
    let to_flattened = flattened - current_position;

    let horizontal = to_flattened.normalize_or_zero() * config.movement_speed;

    let facing = if to_flattened.length_squared() > f32::EPSILON {
        Some(
            Transform::from_translation(current_position)
                .looking_at(flattened, Vec3::Y)
                .rotation,
        )
    } else {
        None
    };

    let vertical = if on_ground
        && config.can_jump
        && is_jump_direction((next_waypoint - current_position).normalize_or_zero())
    {
        config.jump_velocity
    } else {
        apply_gravity(carried_vertical, on_ground, delta_secs, config)
    };

    SteeringOutput {
        horizontal,
        vertical,
        facing,
    }
}

/// Свободное падение: в воздухе вертикальная скорость накапливает gravity
pub fn apply_gravity(carried_vertical: f32, on_ground: bool, delta_secs: f32, config: &NavConfig) -> f32 {
    if on_ground {
        carried_vertical
    } else {
        carried_vertical - config.gravity * delta_secs
    }
}

/// Направление на waypoint — крутой подъём почти строго вверх
pub fn is_jump_direction(direction: Vec3) -> bool {
    direction.y >= JUMP_MIN_VERTICAL
        && direction.x.abs() < JUMP_MAX_HORIZONTAL
        && direction.z.abs() < JUMP_MAX_HORIZONTAL
}
