//! Behavior controller: выбор следующей target позиции.
//!
//! Приоритеты:
//! 1. Pursuit override (внешний стимул `pursue`) — держим engage_distance до entity
//! 2. Default behavior (Idle/Direct/Wandering/Patrolling) — управляется
//!    только retarget timer и target reached событием, сам в `tick` ничего не делает

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use super::config::{NavBehavior, NavConfig};
use super::timer::RetargetTimer;
use super::waypoints::WaypointSource;

/// Гистерезис вокруг engage_distance (метры)
///
/// Без него на границе target пересчитывается каждый тик (дёрганье).
pub const ENGAGE_DEAD_BAND: f32 = 0.25;

/// Pursuit override состояние
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum PursuitState {
    /// Pursuit нет, работает default behavior
    #[default]
    Idle,
    /// Преследуем entity (только ссылка, не владеем)
    Pursuing(Entity),
}

impl PursuitState {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            PursuitState::Idle => None,
            PursuitState::Pursuing(entity) => Some(*entity),
        }
    }

    pub fn is_pursuing(&self) -> bool {
        matches!(self, PursuitState::Pursuing(_))
    }
}

/// Что сделал `tick` в pursuit override (для логов и тестов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitAction {
    /// Pursuit нет — default behavior
    None,
    /// Pursuit закончен, вернулись к base_movement_goal
    Ended,
    /// Слишком близко — отходим назад
    BackAway(Vec3),
    /// Слишком далеко — идём к entity
    Approach(Vec3),
    /// В dead-band — target не трогаем
    Hold,
}

/// Состояние навигации актора
///
/// Инварианты:
/// - `patrol_index` всегда в `[0, len(patrol_route))`
/// - `pursuit == Pursuing(_)` ⇔ retarget timer на паузе
/// - `base_movement_goal` осмыслен только во время pursuit (и сразу после)
/// - до первой target (Idle, неактивирован) target = точка spawn, не origin
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(super::waypoints::NavigationAgent, crate::physics::KinematicBody, Transform)]
pub struct BehaviorController {
    behavior: NavBehavior,
    target_position: Vec3,
    base_movement_goal: Vec3,
    pursuit: PursuitState,
    patrol_index: usize,
    timer: RetargetTimer,
    activated: bool,
}

impl BehaviorController {
    /// `spawn_position` — стартовая target: стоим на месте, пока behavior
    /// не выберет цель
    pub fn new(config: &NavConfig, spawn_position: Vec3) -> Self {
        Self {
            behavior: config.nav_behavior,
            target_position: spawn_position,
            base_movement_goal: spawn_position,
            pursuit: PursuitState::Idle,
            patrol_index: 0,
            timer: RetargetTimer::new(config.nav_time),
            activated: false,
        }
    }

    pub fn behavior(&self) -> NavBehavior {
        self.behavior
    }

    /// Смена поведения в runtime. Идущий pursuit не отменяется.
    ///
    /// Старый retarget timer останавливается, новое поведение стартует
    /// повторной активацией (`activate`): сразу на следующем тике или
    /// после конца pursuit.
    pub fn set_behavior(&mut self, behavior: NavBehavior) {
        if self.behavior == behavior {
            return;
        }
        self.behavior = behavior;
        self.timer.stop();
        self.activated = false;
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    pub fn base_movement_goal(&self) -> Vec3 {
        self.base_movement_goal
    }

    pub fn pursuit(&self) -> PursuitState {
        self.pursuit
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn timer(&self) -> &RetargetTimer {
        &self.timer
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Запросить путь до `pos`, он же новый target_position
    pub fn set_target_position<S: WaypointSource + ?Sized>(&mut self, pos: Vec3, source: &mut S) {
        self.target_position = pos;
        source.set_target(pos);
    }

    /// Двухфазная инициализация: вызывается один раз, когда сцена готова
    /// (источник waypoints уже можно спрашивать).
    ///
    /// Во время pursuit откладывается: target принадлежит pursuit override.
    pub fn activate<R, S>(&mut self, config: &NavConfig, rng: &mut R, source: &mut S)
    where
        R: Rng + ?Sized,
        S: WaypointSource + ?Sized,
    {
        if self.activated || self.pursuit.is_pursuing() {
            return;
        }
        self.activated = true;

        match self.behavior {
            NavBehavior::Idle => {}
            NavBehavior::Direct => {
                self.set_target_position(config.anchor_point, source);
            }
            NavBehavior::Wandering => {
                let point = random_wander_point(config.anchor_point, config.wander_range, rng);
                self.set_target_position(point, source);
                self.timer.start();
            }
            NavBehavior::Patrolling => {
                let len = config.patrol_route.len();
                if len == 0 {
                    crate::log_error("BehaviorController: Patrolling with empty patrol route, staying idle");
                    return;
                }
                // Индекс строго в [0, len)
                self.patrol_index = if config.random_start_index {
                    rng.gen_range(0..len)
                } else {
                    0
                };
                if let Some(&stop) = config.patrol_route.get(self.patrol_index) {
                    self.set_target_position(stop, source);
                }
            }
        }

        crate::log(&format!(
            "🧭 Navigation activated: {:?} → target {:?}",
            self.behavior, self.target_position
        ));
    }

    /// Войти в pursuit override (или сменить entity).
    ///
    /// base_movement_goal снимается только при входе из Idle.
    pub fn pursue(&mut self, entity: Entity) {
        if !self.pursuit.is_pursuing() {
            self.base_movement_goal = self.target_position;
            crate::log(&format!(
                "🎯 Pursuit start: {:?} (saved goal {:?})",
                entity, self.base_movement_goal
            ));
        }
        self.pursuit = PursuitState::Pursuing(entity);
        self.timer.pause();
    }

    /// Выйти из pursuit: таймер продолжает отсчёт, возвращаемся к base_movement_goal
    pub fn end_pursuit<S: WaypointSource + ?Sized>(&mut self, source: &mut S) {
        let PursuitState::Pursuing(entity) = self.pursuit else {
            return;
        };

        self.pursuit = PursuitState::Idle;
        self.timer.resume();
        let goal = self.base_movement_goal;
        self.set_target_position(goal, source);

        crate::log(&format!(
            "🚶 Pursuit end: {:?} → back to {:?}",
            entity, goal
        ));
    }

    /// Waypoint source достиг target_position
    pub fn on_target_reached(&mut self) {
        if self.pursuit.is_pursuing() {
            return;
        }

        match self.behavior {
            // Пауза на точке патруля, дальше — по таймеру.
            // Таймер уже идёт (вернулись на точку после pursuit) — не рестартуем.
            NavBehavior::Patrolling if !self.timer.is_running() => self.timer.start(),
            NavBehavior::Patrolling => {}
            NavBehavior::Idle | NavBehavior::Direct | NavBehavior::Wandering => {}
        }
    }

    /// Retarget timer истёк
    pub fn on_retarget_timer_expired<R, S>(&mut self, config: &NavConfig, rng: &mut R, source: &mut S)
    where
        R: Rng + ?Sized,
        S: WaypointSource + ?Sized,
    {
        match self.behavior {
            NavBehavior::Wandering => {
                let point = random_wander_point(config.anchor_point, config.wander_range, rng);
                self.set_target_position(point, source);
                // Continuous wandering: следующий retarget сразу по таймеру
                self.timer.start();
            }
            NavBehavior::Patrolling => {
                let len = config.patrol_route.len();
                if len == 0 {
                    return;
                }
                self.patrol_index = (self.patrol_index + 1) % len;
                if let Some(&stop) = config.patrol_route.get(self.patrol_index) {
                    self.set_target_position(stop, source);
                    crate::log(&format!(
                        "Patrol → stop #{} {:?}",
                        self.patrol_index, stop
                    ));
                }
            }
            NavBehavior::Idle | NavBehavior::Direct => {}
        }
    }

    /// Продвинуть retarget timer. true — таймер только что сработал.
    pub fn advance_timer(&mut self, delta: Duration) -> bool {
        self.timer.tick(delta)
    }

    /// Тик навигации (до расчёта движения).
    ///
    /// `pursuit_position` — позиция преследуемого entity, `None` если
    /// entity пропал (despawn) — это неявный конец pursuit.
    pub fn tick<S: WaypointSource + ?Sized>(
        &mut self,
        actor_position: Vec3,
        pursuit_position: Option<Vec3>,
        config: &NavConfig,
        source: &mut S,
    ) -> PursuitAction {
        if !self.pursuit.is_pursuing() {
            return PursuitAction::None;
        }

        let Some(entity_position) = pursuit_position else {
            self.end_pursuit(source);
            return PursuitAction::Ended;
        };

        let distance = actor_position.distance(entity_position);

        if distance > config.pursuit_distance {
            self.end_pursuit(source);
            PursuitAction::Ended
        } else if distance < config.engage_distance - ENGAGE_DEAD_BAND {
            let away = (actor_position - entity_position).normalize_or_zero();
            let retreat_target = actor_position + away * (config.engage_distance - distance);
            self.set_target_position(retreat_target, source);
            PursuitAction::BackAway(retreat_target)
        } else if distance > config.engage_distance + ENGAGE_DEAD_BAND {
            self.set_target_position(entity_position, source);
            PursuitAction::Approach(entity_position)
        } else {
            PursuitAction::Hold
        }
    }
}

/// Случайная точка равномерно внутри круга `range` вокруг `anchor`
///
/// Высота = высота anchor. sqrt для равномерной плотности по площади.
pub fn random_wander_point<R: Rng + ?Sized>(anchor: Vec3, range: f32, rng: &mut R) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let radius = range.max(0.0) * rng.gen::<f32>().sqrt();
    Vec3::new(
        anchor.x + angle.cos() * radius,
        anchor.y,
        anchor.z + angle.sin() * radius,
    )
}
