//! Per-species конфиг животного: скорости, восприятие, тайминги
//!
//! Immutable в рантайме, shared между особями через `Arc` (AnimalStatsHandle).

use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки конфига
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("{field}: min ({min}) > max ({max})")]
    InvalidRange { field: &'static str, min: f32, max: f32 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfBounds {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("failed to parse animal stats: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Параметры вида
///
/// Инварианты: все значения конечны, диапазоны min ≤ max, скорости ≥ 0,
/// view_radius и turn_speed > 0, graze_chance ∈ [0, 1], view_angle ∈ [0, 360].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct AnimalStats {
    /// Скорость шага (m/s)
    pub walk_speed: f32,
    /// Скорость бега (m/s)
    pub run_speed: f32,

    /// Дальность обнаружения целей (метры)
    pub view_radius: f32,
    /// Полная ширина конуса зрения (градусы)
    pub view_angle: f32,

    /// Idle длится U[min_idle_time, max_idle_time] секунд
    pub min_idle_time: f32,
    pub max_idle_time: f32,

    /// Вероятность выбрать Graze вместо Wander после Idle
    pub graze_chance: f32,

    /// Лимит скорости поворота при бегстве (град/сек)
    pub turn_speed_deg_per_sec: f32,

    /// Длительность рывка бегства (min, max) секунд
    pub flee_duration_range: (f32, f32),
}

impl Default for AnimalStats {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 4.0,
            view_radius: 12.0,
            view_angle: 120.0,
            min_idle_time: 1.0,
            max_idle_time: 3.0,
            graze_chance: 0.4,
            turn_speed_deg_per_sec: 360.0,
            flee_duration_range: (2.0, 3.0),
        }
    }
}

impl AnimalStats {
    /// Загрузить из JSON (отсутствующие поля = default) и провалидировать
    pub fn from_json(source: &str) -> Result<Self, StatsError> {
        let stats: Self = serde_json::from_str(source)?;
        stats.validate()?;
        Ok(stats)
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(StatsError::NonFinite { field, value });
            }
        }

        for (field, value) in [
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("min_idle_time", self.min_idle_time),
            ("flee_duration_range.min", self.flee_duration_range.0),
        ] {
            if value < 0.0 {
                return Err(StatsError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("view_radius", self.view_radius),
            ("turn_speed_deg_per_sec", self.turn_speed_deg_per_sec),
        ] {
            if value <= 0.0 {
                return Err(StatsError::NonPositive { field, value });
            }
        }

        check_bounds("graze_chance", self.graze_chance, 0.0, 1.0)?;
        check_bounds("view_angle", self.view_angle, 0.0, 360.0)?;

        if self.min_idle_time > self.max_idle_time {
            return Err(StatsError::InvalidRange {
                field: "idle_time",
                min: self.min_idle_time,
                max: self.max_idle_time,
            });
        }

        let (flee_min, flee_max) = self.flee_duration_range;
        if flee_min > flee_max {
            return Err(StatsError::InvalidRange {
                field: "flee_duration_range",
                min: flee_min,
                max: flee_max,
            });
        }

        Ok(())
    }

    fn fields(&self) -> [(&'static str, f32); 10] {
        [
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("view_radius", self.view_radius),
            ("view_angle", self.view_angle),
            ("min_idle_time", self.min_idle_time),
            ("max_idle_time", self.max_idle_time),
            ("graze_chance", self.graze_chance),
            ("turn_speed_deg_per_sec", self.turn_speed_deg_per_sec),
            ("flee_duration_range.min", self.flee_duration_range.0),
            ("flee_duration_range.max", self.flee_duration_range.1),
        ]
    }
}

fn check_bounds(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), StatsError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(StatsError::OutOfBounds { field, value, min, max })
    }
}

/// Component: shared ссылка на stats вида
///
/// Много агентов → один `Arc<AnimalStats>`.
#[derive(Component, Debug, Clone)]
pub struct AnimalStatsHandle(pub Arc<AnimalStats>);

impl AnimalStatsHandle {
    pub fn new(stats: AnimalStats) -> Self {
        Self(Arc::new(stats))
    }
}

impl std::ops::Deref for AnimalStatsHandle {
    type Target = AnimalStats;

    fn deref(&self) -> &AnimalStats {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_are_valid() {
        let stats = AnimalStats::default();
        assert!(stats.validate().is_ok());
        assert_eq!(stats.view_radius, 12.0);
        assert_eq!(stats.view_angle, 120.0);
        assert_eq!(stats.flee_duration_range, (2.0, 3.0));
    }

    #[test]
    fn test_inverted_idle_range_rejected() {
        let stats = AnimalStats {
            min_idle_time: 4.0,
            max_idle_time: 1.0,
            ..default()
        };

        assert!(matches!(
            stats.validate(),
            Err(StatsError::InvalidRange { field: "idle_time", .. })
        ));
    }

    #[test]
    fn test_graze_chance_bounds() {
        let stats = AnimalStats {
            graze_chance: 1.5,
            ..default()
        };

        assert!(matches!(
            stats.validate(),
            Err(StatsError::OutOfBounds { field: "graze_chance", .. })
        ));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let stats = AnimalStats {
            run_speed: -1.0,
            ..default()
        };

        assert!(matches!(stats.validate(), Err(StatsError::Negative { field: "run_speed", .. })));
    }

    #[test]
    fn test_zero_view_radius_and_turn_speed_rejected() {
        let blind = AnimalStats {
            view_radius: 0.0,
            ..default()
        };
        assert!(matches!(
            blind.validate(),
            Err(StatsError::NonPositive { field: "view_radius", .. })
        ));

        let stiff = AnimalStats {
            turn_speed_deg_per_sec: 0.0,
            ..default()
        };
        assert!(matches!(
            stiff.validate(),
            Err(StatsError::NonPositive { field: "turn_speed_deg_per_sec", .. })
        ));
    }

    #[test]
    fn test_infinite_upper_bounds_rejected() {
        let endless_idle = AnimalStats {
            max_idle_time: f32::INFINITY,
            ..default()
        };
        assert!(matches!(
            endless_idle.validate(),
            Err(StatsError::NonFinite { field: "max_idle_time", .. })
        ));

        let endless_flee = AnimalStats {
            flee_duration_range: (2.0, f32::INFINITY),
            ..default()
        };
        assert!(matches!(
            endless_flee.validate(),
            Err(StatsError::NonFinite { field: "flee_duration_range.max", .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let stats = AnimalStats {
            walk_speed: f32::NAN,
            ..default()
        };

        assert!(matches!(stats.validate(), Err(StatsError::NonFinite { field: "walk_speed", .. })));
    }

    #[test]
    fn test_from_json_partial() {
        let stats = AnimalStats::from_json(r#"{ "walk_speed": 1.5, "flee_duration_range": [1.0, 4.0] }"#)
            .expect("valid stats");

        assert_eq!(stats.walk_speed, 1.5);
        assert_eq!(stats.flee_duration_range, (1.0, 4.0));
        assert_eq!(stats.run_speed, 4.0);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            AnimalStats::from_json(r#"{ "flee_duration_range": [5.0, 1.0] }"#),
            Err(StatsError::InvalidRange { .. })
        ));
        assert!(matches!(AnimalStats::from_json("not json"), Err(StatsError::Parse(_))));
    }

    #[test]
    fn test_handle_is_shared() {
        let handle = AnimalStatsHandle::new(AnimalStats::default());
        let other = handle.clone();

        assert!(Arc::ptr_eq(&handle.0, &other.0));
        assert_eq!(other.walk_speed, 2.0);
    }
}
