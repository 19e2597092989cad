//! Sensor module — stateless геометрические запросы к collision world
//!
//! Архитектура:
//! - `WorldQuery` = ray-cast сервис (headless AABB мир или Rapier context)
//! - `queries` = visibility / cliff / obstacle / ground snap поверх WorldQuery
//! - `SensorConfig` = per-agent параметры (eye offset, фильтры, дистанции проб)
//!
//! Ничего не мутирует — безопасно вызывать каждый тик из любого количества агентов.

use bevy::prelude::*;

use crate::collision_layers::{COLLISION_MASK_GROUND, COLLISION_MASK_SIGHT};

pub mod headless;
pub mod queries;
pub mod rapier;


pub use headless::{HeadlessWorld, StaticCollider};
pub use queries::{can_see_target, is_cliff_ahead, is_obstacle_ahead, snap_to_ground, SightTarget};
pub use rapier::RapierWorldQuery;

/// Фильтр raycast: маска слоёв + (опционально) исключённое тело
///
/// `exclude` = собственный collider агента, чтобы луч из глаз не упирался в себя.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct CollisionFilter {
    pub mask: u32,
    pub exclude: Option<Entity>,
}

impl CollisionFilter {
    pub const fn new(mask: u32) -> Self {
        Self { mask, exclude: None }
    }

    pub fn excluding(self, entity: Entity) -> Self {
        Self {
            exclude: Some(entity),
            ..self
        }
    }

    /// Проходит ли collider на слое `layer` (и с владельцем `entity`) через фильтр
    pub fn accepts(&self, layer: u32, entity: Option<Entity>) -> bool {
        if self.mask & layer == 0 {
            return false;
        }
        match (self.exclude, entity) {
            (Some(excluded), Some(owner)) => excluded != owner,
            _ => true,
        }
    }
}

/// Результат raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Точка попадания (world space)
    pub point: Vec3,
    /// Дистанция от origin вдоль луча
    pub distance: f32,
    /// Entity коллайдера (None для безымянной статики)
    pub entity: Option<Entity>,
}

/// Ray-cast сервис мира
///
/// `direction` — единичный вектор. Луч, начинающийся внутри collider'а,
/// попадает на дистанции 0 (solid семантика, как у Rapier `solid = true`).
pub trait WorldQuery {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &CollisionFilter,
    ) -> Option<RayHit>;
}

/// Per-agent параметры сенсоров
///
/// Read-only после спавна. `eye_offset = None` → глаза в позиции агента.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SensorConfig {
    /// Локальное смещение глаз (в системе координат агента)
    pub eye_offset: Option<Vec3>,
    /// Что блокирует взгляд / движение
    pub obstacle_filter: CollisionFilter,
    /// Что считается землёй
    pub ground_filter: CollisionFilter,
    /// Cliff probe: насколько вперёд выносим точку (метры)
    pub cliff_probe_forward: f32,
    /// Cliff probe: максимальная глубина поиска земли (метры)
    pub cliff_drop_distance: f32,
    /// Obstacle probe: длина луча вперёд (метры)
    pub obstacle_probe_distance: f32,
    /// Ground snap: старт луча над позицией (метры)
    pub ground_snap_up: f32,
    /// Ground snap: длина луча вниз (метры)
    pub ground_snap_down: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            eye_offset: None,
            obstacle_filter: CollisionFilter::new(COLLISION_MASK_SIGHT),
            ground_filter: CollisionFilter::new(COLLISION_MASK_GROUND),
            cliff_probe_forward: 1.2,
            cliff_drop_distance: 1.2,
            obstacle_probe_distance: 0.8,
            ground_snap_up: 3.0,
            ground_snap_down: 6.0,
        }
    }
}

impl SensorConfig {
    /// Позиция глаз для агента с данной позой
    pub fn eye_origin(&self, position: Vec3, rotation: Quat) -> Vec3 {
        match self.eye_offset {
            Some(offset) => position + rotation * offset,
            None => position,
        }
    }

    /// Тот же конфиг, но фильтры не видят собственное тело агента
    pub fn for_agent(&self, entity: Entity) -> Self {
        Self {
            obstacle_filter: self.obstacle_filter.excluding(entity),
            ground_filter: self.ground_filter.excluding(entity),
            ..self.clone()
        }
    }
}
