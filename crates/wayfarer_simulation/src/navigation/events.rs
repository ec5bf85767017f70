//! Navigation events — внешние стимулы и уведомления waypoint source.
//!
//! Все события дренируются один раз за тик внутри navigation chain,
//! поэтому `pursue` всегда сериализован с `tick`.

use bevy::prelude::*;

/// Стимул: начать (или переключить) преследование
///
/// Генерируется detection логикой снаружи ядра (vision cone, урон и т.п.)
#[derive(Event, Debug, Clone)]
pub struct PursueEntity {
    /// Кто преследует
    pub pursuer: Entity,
    /// Кого преследуем
    pub target: Entity,
}

/// Стимул: прекратить преследование (вернуться к default behavior)
#[derive(Event, Debug, Clone)]
pub struct StopPursuit {
    pub pursuer: Entity,
}

/// Waypoint source достиг target позиции (одноразово на каждый target)
#[derive(Event, Debug, Clone)]
pub struct TargetReached {
    pub entity: Entity,
}

/// Смена default behavior в runtime (pursuit не отменяет)
#[derive(Event, Debug, Clone)]
pub struct BehaviorChanged {
    pub entity: Entity,
    pub behavior: super::NavBehavior,
}
