//! Retarget timer — one-shot countdown для выбора новой под-цели.

use bevy::prelude::*;
use std::time::Duration;

/// One-shot таймер retarget (wander point / следующая patrol точка)
///
/// Обёртка над `bevy::time::Timer` (TimerMode::Once):
/// - до первого `start()` не тикает
/// - срабатывает ровно один раз на каждый `start()`
/// - на паузе (pursuit override) не тикает и не срабатывает
/// - `resume()` сохраняет оставшееся время (не рестартует отсчёт)
#[derive(Debug, Clone, Reflect)]
pub struct RetargetTimer {
    timer: Timer,
    running: bool,
}

impl RetargetTimer {
    pub fn new(nav_time: f32) -> Self {
        Self {
            timer: Timer::from_seconds(nav_time.max(0.0), TimerMode::Once),
            running: false,
        }
    }

    /// Начать (или перезапустить) отсчёт с нуля. Pause state не меняется.
    pub fn start(&mut self) {
        self.timer.reset();
        self.running = true;
    }

    /// Остановить отсчёт без срабатывания (смена behavior)
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn pause(&mut self) {
        self.timer.pause();
    }

    pub fn resume(&mut self) {
        self.timer.unpause();
    }

    pub fn is_paused(&self) -> bool {
        self.timer.paused()
    }

    /// Идёт ли отсчёт (стартован и ещё не сработал)
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> f32 {
        self.timer.remaining_secs()
    }

    /// Продвинуть таймер на `delta`. Возвращает true при срабатывании.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.running || self.timer.paused() {
            return false;
        }

        self.timer.tick(delta);
        if self.timer.finished() {
            self.running = false;
            return true;
        }
        false
    }
}

impl Default for RetargetTimer {
    fn default() -> Self {
        Self::new(3.0)
    }
}
