//! Waypoint source: кто считает путь, тот и отдаёт waypoints.
//!
//! Path planning живёт снаружи (navmesh движка, flow field и т.п.).
//! Ядро навигации видит только `WaypointSource`.

use bevy::prelude::*;
use std::collections::VecDeque;

/// Допуск по высоте для "waypoint пройден" (метры)
pub const WAYPOINT_HEIGHT_TOLERANCE: f32 = 1.0;

/// Источник waypoints для навигации
///
/// `set_target` заменяет текущий путь (новый запрос отменяет старый неявно).
pub trait WaypointSource {
    /// Запросить путь до `position`
    fn set_target(&mut self, position: Vec3);
    /// Следующая точка пути
    fn next_waypoint(&self) -> Vec3;
    /// true когда идти больше некуда
    fn is_finished(&self) -> bool;
}

/// Дефолтный waypoint source (headless симуляция, тесты)
///
/// Без внешнего планировщика путь — прямая до target.
/// Хост с navmesh кладёт готовый путь через `set_path`.
///
/// Reached-уведомление одноразовое: флаг `reached` трекает ПЕРЕХОД
/// unreached → reached, сбрасывается при новом target.
#[derive(Component, Debug, Clone)]
pub struct NavigationAgent {
    target: Option<Vec3>,
    path: VecDeque<Vec3>,
    /// Waypoint считается пройденным ближе этой дистанции (XZ)
    pub desired_distance: f32,
    reached: bool,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl NavigationAgent {
    pub fn new(desired_distance: f32) -> Self {
        Self {
            target: None,
            path: VecDeque::new(),
            desired_distance,
            reached: false,
        }
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Оставшиеся waypoints (включая target)
    pub fn remaining_waypoints(&self) -> usize {
        self.path.len()
    }

    /// Путь от внешнего планировщика. Последняя точка становится target.
    pub fn set_path(&mut self, points: impl IntoIterator<Item = Vec3>) {
        self.path = points.into_iter().collect();
        self.target = self.path.back().copied();
        self.reached = self.path.is_empty();
    }

    /// Продвинуть путь по текущей позиции актора.
    ///
    /// Возвращает true ровно один раз — в момент достижения target.
    pub fn update_progress(&mut self, position: Vec3) -> bool {
        while let Some(&waypoint) = self.path.front() {
            if !self.is_close(position, waypoint) {
                break;
            }
            self.path.pop_front();
        }

        if self.path.is_empty() && self.target.is_some() && !self.reached {
            self.reached = true;
            return true;
        }
        false
    }

    /// Waypoint над/под актором (уступ, прыжок) не считается пройденным
    fn is_close(&self, position: Vec3, waypoint: Vec3) -> bool {
        horizontal_distance(position, waypoint) <= self.desired_distance
            && (waypoint.y - position.y).abs() <= WAYPOINT_HEIGHT_TOLERANCE
    }
}

impl WaypointSource for NavigationAgent {
    fn set_target(&mut self, position: Vec3) {
        self.target = Some(position);
        self.path.clear();
        self.path.push_back(position);
        self.reached = false;
    }

    fn next_waypoint(&self) -> Vec3 {
        self.path
            .front()
            .copied()
            .or(self.target)
            .unwrap_or(Vec3::ZERO)
    }

    fn is_finished(&self) -> bool {
        self.path.is_empty()
    }
}

/// Дистанция в плоскости XZ (навигация не смотрит на высоту)
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
