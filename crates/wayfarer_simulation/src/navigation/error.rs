//! Ошибки конфигурации навигации.

use thiserror::Error;

/// Невалидная конфигурация `NavConfig`.
///
/// Проверяется один раз при spawn / загрузке пресета (fail fast),
/// в runtime навигация уже не падает.
#[derive(Debug, Error)]
pub enum NavConfigError {
    #[error("invalid configuration: patrol route is empty while behavior is Patrolling")]
    EmptyPatrolRoute,

    #[error("invalid configuration: wander_range must be >= 0 (got {0})")]
    NegativeWanderRange(f32),

    #[error("invalid configuration: engage_distance must be >= 0 (got {0})")]
    NegativeEngageDistance(f32),

    #[error("invalid configuration: nav_time must be > 0 (got {0})")]
    NonPositiveNavTime(f32),

    #[error("invalid configuration: movement_speed must be >= 0 (got {0})")]
    NegativeMovementSpeed(f32),

    #[error("invalid configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
