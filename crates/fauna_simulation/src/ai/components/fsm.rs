//! FSM AI components (state machine, per-state locals, transitions).

use bevy::prelude::*;

/// Состояние животного + его persisted locals
///
/// Каждый вариант хранит то, что живёт между тиками внутри состояния:
/// таймер и параметры, вытянутые из RNG при входе. При каждом входе в
/// состояние всё тянется заново.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum AnimalState {
    /// Idle — стоим, ждём `remaining` секунд
    Idle {
        /// Сколько ещё стоять (секунды)
        remaining: f32,
    },

    /// Wander — бродим с фиксированным yaw bias
    Wander {
        elapsed: f32,
        duration: f32,
        /// Скорость поворота на всё состояние (град/сек)
        yaw_bias_deg: f32,
    },

    /// Graze — пасёмся на месте, покачивая головой
    Graze { elapsed: f32, duration: f32 },

    /// Flee — бежим от угрозы, не прерывается до конца
    Flee { elapsed: f32, duration: f32 },
}

impl Default for AnimalState {
    fn default() -> Self {
        Self::Idle { remaining: 0.0 }
    }
}

impl AnimalState {
    pub fn kind(&self) -> AnimalStateKind {
        match self {
            Self::Idle { .. } => AnimalStateKind::Idle,
            Self::Wander { .. } => AnimalStateKind::Wander,
            Self::Graze { .. } => AnimalStateKind::Graze,
            Self::Flee { .. } => AnimalStateKind::Flee,
        }
    }

    /// Истекла ли вытянутая длительность состояния
    pub fn is_expired(&self) -> bool {
        match *self {
            Self::Idle { remaining } => remaining <= 0.0,
            Self::Wander { elapsed, duration, .. }
            | Self::Graze { elapsed, duration }
            | Self::Flee { elapsed, duration } => elapsed >= duration,
        }
    }

    /// Продвинуть таймер состояния на `delta` секунд
    pub fn advance(&mut self, delta: f32) {
        match self {
            Self::Idle { remaining } => *remaining -= delta,
            Self::Wander { elapsed, .. } | Self::Graze { elapsed, .. } | Self::Flee { elapsed, .. } => {
                *elapsed += delta
            }
        }
    }
}

/// Дискриминант состояния (для логов, тестов, статистики)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum AnimalStateKind {
    Idle,
    Wander,
    Graze,
    Flee,
}

impl AnimalStateKind {
    pub const ALL: [AnimalStateKind; 4] = [Self::Idle, Self::Wander, Self::Graze, Self::Flee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Wander => "Wander",
            Self::Graze => "Graze",
            Self::Flee => "Flee",
        }
    }
}

/// Почему произошёл переход
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TransitionCause {
    /// Первый тик после активации
    Activated,
    /// Вытянутая длительность истекла
    Expired,
    /// Сработало глобальное правило бегства
    ThreatSighted,
    /// Нет stats — агент может только стоять
    MissingStats,
}

/// Один переход FSM за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: AnimalStateKind,
    pub to: AnimalStateKind,
    pub cause: TransitionCause,
}

/// Component: FSM животного
///
/// `activated = false` → на следующем тике вход в Idle со свежими draws.
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct AnimalBrain {
    pub(crate) state: AnimalState,
    pub(crate) activated: bool,
}

impl AnimalBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnimalState {
        &self.state
    }

    pub fn kind(&self) -> AnimalStateKind {
        self.state.kind()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Сброс к Idle: следующий тик начнёт FSM заново
    pub fn reset(&mut self) {
        self.state = AnimalState::default();
        self.activated = false;
    }
}
