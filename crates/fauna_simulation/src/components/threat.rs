//! Threat компоненты: кого агент опасается
//!
//! Threat — non-owning ссылка (Entity). Цель может исчезнуть в любой тик,
//! FSM резолвит её заново каждый тик и считает невалидную отсутствующей.

use bevy::prelude::*;

/// Кто назначает угрозу агенту
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum ThreatTracking {
    /// Хост сам пишет `Threat::entity`
    #[default]
    Manual,
    /// Система `assign_nearest_threats` выбирает ближайший ThreatSource в радиусе
    Nearest { scan_radius: f32 },
}

/// Component: текущая угроза агента
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Threat {
    pub entity: Option<Entity>,
    pub tracking: ThreatTracking,
}

impl Threat {
    pub fn manual(entity: Entity) -> Self {
        Self {
            entity: Some(entity),
            tracking: ThreatTracking::Manual,
        }
    }

    pub fn nearest(scan_radius: f32) -> Self {
        Self {
            entity: None,
            tracking: ThreatTracking::Nearest { scan_radius },
        }
    }
}

/// Маркер: entity, которую животные считают угрозой (игрок, хищник)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ThreatSource;

/// Маркер деактивации: FSM агента не тикает, motion intent сброшен
///
/// Снятие маркера = повторная активация (FSM стартует заново с Idle).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dormant;
