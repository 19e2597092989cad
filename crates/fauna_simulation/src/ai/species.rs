//! Species specialization — per-species тюнинг поверх общего FSM
//!
//! `SpeciesBehavior` — capability interface: yaw диапазоны, avoidance,
//! множитель скорости бегства и сам предикат "надо ли бежать".
//! `SpeciesProfile` — data-driven реализация (пресеты + serde конфиг).

use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::AnimalStats;
use crate::sensors::{can_see_target, SensorConfig, SightTarget, WorldQuery};

/// Всё, что нужно предикату бегства в текущий тик
///
/// Любая часть может отсутствовать — тогда "не вижу, не бегу".
pub struct FleeCheck<'a> {
    pub stats: Option<&'a AnimalStats>,
    pub sensors: Option<&'a SensorConfig>,
    pub threat: Option<SightTarget>,
    pub world: &'a dyn WorldQuery,
    pub position: Vec3,
    pub rotation: Quat,
}

impl FleeCheck<'_> {
    /// Stats + sensors + threat на месте, и угроза в поле зрения без окклюзии
    pub fn threat_visible(&self) -> bool {
        let (Some(stats), Some(sensors), Some(threat)) = (self.stats, self.sensors, self.threat) else {
            return false;
        };

        let eye = sensors.eye_origin(self.position, self.rotation);
        let forward = self.rotation * Vec3::NEG_Z;

        can_see_target(
            eye,
            forward,
            Some(threat),
            stats.view_radius,
            stats.view_angle,
            &sensors.obstacle_filter,
            self.world,
        )
    }

    /// Дистанция до угрозы (если она есть)
    pub fn threat_distance(&self) -> Option<f32> {
        self.threat.map(|threat| self.position.distance(threat.position))
    }
}

/// Capability interface вида
pub trait SpeciesBehavior: Send + Sync {
    fn name(&self) -> &str;

    /// Wander: случайный yaw bias берётся из ±этого (град/сек)
    fn wander_yaw_range_deg(&self) -> f32 {
        90.0
    }

    /// Graze: покачивание головой ±этого (град/сек)
    fn graze_yaw_jitter_deg(&self) -> f32 {
        10.0
    }

    /// Резкий разворот при обрыве/препятствии (град/сек)
    fn obstacle_avoid_yaw_deg(&self) -> f32 {
        120.0
    }

    /// Множитель run_speed во время Flee
    fn flee_speed_multiplier(&self) -> f32 {
        1.0
    }

    /// Глобальное правило перехода в Flee
    fn should_flee(&self, check: &FleeCheck<'_>) -> bool {
        check.threat_visible()
    }
}

/// Когда вид убегает
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub enum FleePolicy {
    /// Видит угрозу → бежит
    Sighted,
    /// Никогда не бежит (flee правило отключено)
    Never,
    /// Видит угрозу И она ближе чем `0` метров
    WithinDistance(f32),
}

/// Data-driven вид
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SpeciesProfile {
    pub name: String,
    pub wander_yaw_range_deg: f32,
    pub graze_yaw_jitter_deg: f32,
    pub obstacle_avoid_yaw_deg: f32,
    pub flee_speed_multiplier: f32,
    pub flee_policy: FleePolicy,
}

impl Default for SpeciesProfile {
    fn default() -> Self {
        Self::generic()
    }
}

impl SpeciesProfile {
    /// Базовое животное: пугливое, все параметры по умолчанию
    pub fn generic() -> Self {
        Self {
            name: "animal".to_string(),
            wander_yaw_range_deg: 90.0,
            graze_yaw_jitter_deg: 10.0,
            obstacle_avoid_yaw_deg: 120.0,
            flee_speed_multiplier: 1.0,
            flee_policy: FleePolicy::Sighted,
        }
    }

    /// Свинья: никогда не убегает, чуть другой темп поворотов
    pub fn pig() -> Self {
        Self {
            name: "pig".to_string(),
            wander_yaw_range_deg: 80.0,
            graze_yaw_jitter_deg: 12.0,
            obstacle_avoid_yaw_deg: 140.0,
            flee_speed_multiplier: 1.0,
            flee_policy: FleePolicy::Never,
        }
    }
}

impl SpeciesBehavior for SpeciesProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn wander_yaw_range_deg(&self) -> f32 {
        self.wander_yaw_range_deg
    }

    fn graze_yaw_jitter_deg(&self) -> f32 {
        self.graze_yaw_jitter_deg
    }

    fn obstacle_avoid_yaw_deg(&self) -> f32 {
        self.obstacle_avoid_yaw_deg
    }

    fn flee_speed_multiplier(&self) -> f32 {
        self.flee_speed_multiplier
    }

    fn should_flee(&self, check: &FleeCheck<'_>) -> bool {
        match self.flee_policy {
            FleePolicy::Never => false,
            FleePolicy::Sighted => check.threat_visible(),
            FleePolicy::WithinDistance(max_distance) => {
                check.threat_distance().is_some_and(|distance| distance <= max_distance)
                    && check.threat_visible()
            }
        }
    }
}

/// Component: вид агента (shared между всеми особями вида)
#[derive(Component, Clone)]
pub struct Species(pub Arc<dyn SpeciesBehavior>);

impl Species {
    pub fn new(behavior: impl SpeciesBehavior + 'static) -> Self {
        Self(Arc::new(behavior))
    }

    pub fn behavior(&self) -> &dyn SpeciesBehavior {
        self.0.as_ref()
    }
}

impl Default for Species {
    fn default() -> Self {
        Self::new(SpeciesProfile::generic())
    }
}

impl std::fmt::Debug for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Species").field(&self.0.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::HeadlessWorld;

    fn check_with_threat_at<'a>(
        stats: &'a AnimalStats,
        sensors: &'a SensorConfig,
        world: &'a HeadlessWorld,
        threat_position: Vec3,
    ) -> FleeCheck<'a> {
        FleeCheck {
            stats: Some(stats),
            sensors: Some(sensors),
            threat: Some(SightTarget {
                entity: Entity::from_raw(1),
                position: threat_position,
            }),
            world,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    #[test]
    fn test_generic_flees_when_threat_visible() {
        let stats = AnimalStats::default();
        let sensors = SensorConfig::default();
        let world = HeadlessWorld::new();
        let check = check_with_threat_at(&stats, &sensors, &world, Vec3::new(0.0, 0.0, -5.0));

        assert!(SpeciesProfile::generic().should_flee(&check));
    }

    #[test]
    fn test_generic_ignores_threat_behind() {
        let stats = AnimalStats::default();
        let sensors = SensorConfig::default();
        let world = HeadlessWorld::new();
        let check = check_with_threat_at(&stats, &sensors, &world, Vec3::new(0.0, 0.0, 5.0));

        assert!(!SpeciesProfile::generic().should_flee(&check));
    }

    #[test]
    fn test_pig_never_flees() {
        let stats = AnimalStats::default();
        let sensors = SensorConfig::default();
        let world = HeadlessWorld::new();
        let check = check_with_threat_at(&stats, &sensors, &world, Vec3::new(0.0, 0.0, -1.0));

        assert!(!SpeciesProfile::pig().should_flee(&check));
    }

    #[test]
    fn test_within_distance_policy() {
        let stats = AnimalStats::default();
        let sensors = SensorConfig::default();
        let world = HeadlessWorld::new();
        let cautious = SpeciesProfile {
            flee_policy: FleePolicy::WithinDistance(4.0),
            ..SpeciesProfile::generic()
        };

        let far = check_with_threat_at(&stats, &sensors, &world, Vec3::new(0.0, 0.0, -8.0));
        let near = check_with_threat_at(&stats, &sensors, &world, Vec3::new(0.0, 0.0, -3.0));
        assert!(!cautious.should_flee(&far));
        assert!(cautious.should_flee(&near));
    }

    #[test]
    fn test_missing_references_never_flee() {
        let stats = AnimalStats::default();
        let world = HeadlessWorld::new();
        let check = FleeCheck {
            stats: Some(&stats),
            sensors: None,
            threat: Some(SightTarget {
                entity: Entity::from_raw(1),
                position: Vec3::new(0.0, 0.0, -2.0),
            }),
            world: &world,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        };

        assert!(!check.threat_visible());
    }

    #[test]
    fn test_profile_from_json_uses_defaults_for_missing_fields() {
        let profile: SpeciesProfile =
            serde_json::from_str(r#"{ "name": "goat", "flee_policy": "Never" }"#).expect("valid profile");

        assert_eq!(profile.name, "goat");
        assert_eq!(profile.flee_policy, FleePolicy::Never);
        assert_eq!(profile.wander_yaw_range_deg, 90.0);
    }
}
