//! Navigation config: поведение по умолчанию и параметры движения.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::NavConfigError;

/// Поведение навигации по умолчанию (без pursuit override)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum NavBehavior {
    /// Стоим на месте, сами цель не выбираем
    #[default]
    Idle,
    /// Идём к anchor_point один раз
    Direct,
    /// Случайные точки внутри круга anchor_point + wander_range
    Wandering,
    /// Обход patrol_route по кругу с паузой на каждой точке
    Patrolling,
}

/// Параметры навигации актора
///
/// Задаются один раз при spawn, в runtime только читаются.
/// Gravity — явный параметр (никаких глобальных настроек проекта).
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct NavConfig {
    pub nav_behavior: NavBehavior,
    /// Горизонтальная скорость (м/с)
    pub movement_speed: f32,
    pub can_jump: bool,
    /// Вертикальный импульс прыжка (м/с)
    pub jump_velocity: f32,
    /// Интервал retarget timer (секунды)
    pub nav_time: f32,
    /// Patrol: стартовать со случайной точки маршрута
    pub random_start_index: bool,
    pub patrol_route: Vec<Vec3>,
    /// Центр зоны wandering (и цель для Direct)
    pub anchor_point: Vec3,
    pub wander_range: f32,
    /// Дистанция, которую держим от pursuit entity
    pub engage_distance: f32,
    /// Дальше этой дистанции pursuit заканчивается
    pub pursuit_distance: f32,
    /// Ускорение свободного падения (м/с², положительное)
    pub gravity: f32,
    /// Waypoint считается достигнутым ближе этой дистанции (XZ)
    pub target_desired_distance: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            nav_behavior: NavBehavior::Idle,
            movement_speed: 5.0,
            can_jump: false,
            jump_velocity: 4.5,
            nav_time: 3.0,
            random_start_index: false,
            patrol_route: Vec::new(),
            anchor_point: Vec3::ZERO,
            wander_range: 10.0,
            engage_distance: 3.0,
            pursuit_distance: 20.0,
            gravity: 9.8,
            target_desired_distance: 0.5,
        }
    }
}

impl NavConfig {
    pub fn wandering(anchor_point: Vec3, wander_range: f32) -> Self {
        Self {
            nav_behavior: NavBehavior::Wandering,
            anchor_point,
            wander_range,
            ..default()
        }
    }

    pub fn patrolling(patrol_route: Vec<Vec3>) -> Self {
        Self {
            nav_behavior: NavBehavior::Patrolling,
            patrol_route,
            ..default()
        }
    }

    pub fn direct(goal: Vec3) -> Self {
        Self {
            nav_behavior: NavBehavior::Direct,
            anchor_point: goal,
            ..default()
        }
    }

    pub fn with_speed(mut self, movement_speed: f32) -> Self {
        self.movement_speed = movement_speed;
        self
    }

    pub fn with_nav_time(mut self, nav_time: f32) -> Self {
        self.nav_time = nav_time;
        self
    }

    pub fn with_jump(mut self, jump_velocity: f32) -> Self {
        self.can_jump = true;
        self.jump_velocity = jump_velocity;
        self
    }

    pub fn with_pursuit(mut self, engage_distance: f32, pursuit_distance: f32) -> Self {
        self.engage_distance = engage_distance;
        self.pursuit_distance = pursuit_distance;
        self
    }

    pub fn with_random_start(mut self) -> Self {
        self.random_start_index = true;
        self
    }

    /// Fail fast проверка: пустой patrol route при Patrolling сломал бы
    /// `patrol_index mod len` в runtime.
    pub fn validate(&self) -> Result<(), NavConfigError> {
        if self.nav_behavior == NavBehavior::Patrolling && self.patrol_route.is_empty() {
            return Err(NavConfigError::EmptyPatrolRoute);
        }
        if self.wander_range < 0.0 {
            return Err(NavConfigError::NegativeWanderRange(self.wander_range));
        }
        if self.engage_distance < 0.0 {
            return Err(NavConfigError::NegativeEngageDistance(self.engage_distance));
        }
        if self.movement_speed < 0.0 {
            return Err(NavConfigError::NegativeMovementSpeed(self.movement_speed));
        }
        let uses_timer = matches!(
            self.nav_behavior,
            NavBehavior::Wandering | NavBehavior::Patrolling
        );
        if uses_timer && self.nav_time <= 0.0 {
            return Err(NavConfigError::NonPositiveNavTime(self.nav_time));
        }

        if self.pursuit_distance <= self.engage_distance {
            crate::log_warning(&format!(
                "NavConfig: pursuit_distance {} <= engage_distance {}, pursuit will end before engaging",
                self.pursuit_distance, self.engage_distance
            ));
        }

        Ok(())
    }

    /// Загрузка пресета из RON (отсутствующие поля берутся из Default)
    pub fn from_ron(source: &str) -> Result<Self, NavConfigError> {
        let config: NavConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}
