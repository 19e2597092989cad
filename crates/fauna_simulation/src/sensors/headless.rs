//! Headless collision world — AABB коллайдеры без physics engine
//!
//! Используется в headless симуляции и тестах (детерминированно, без Rapier).
//! Статика: земля, камни, стены; опционально привязанные к Entity (цели LOS).

use bevy::prelude::*;

use super::{CollisionFilter, RayHit, WorldQuery};
use crate::collision_layers::{COLLISION_LAYER_GROUND, COLLISION_LAYER_OBSTACLES, COLLISION_LAYER_THREATS};

/// Осевой бокс-коллайдер
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub min: Vec3,
    pub max: Vec3,
    pub layer: u32,
    pub entity: Option<Entity>,
}

impl StaticCollider {
    pub fn from_center(center: Vec3, half_extents: Vec3, layer: u32) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
            layer,
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Slab test. Возвращает дистанцию входа (0 если origin внутри)
    fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                // Луч параллелен slab'у — либо внутри по этой оси, либо промах
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };

            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }
}

/// Resource: headless мир коллайдеров
///
/// Наличие ресурса = headless backend (см. `AnimalAIPlugin`).
#[derive(Resource, Debug, Clone, Default)]
pub struct HeadlessWorld {
    pub colliders: Vec<StaticCollider>,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Плоская земля: верхняя грань на высоте `height`, квадрат ±half_extent
    pub fn with_ground(mut self, height: f32, half_extent: f32) -> Self {
        self.colliders.push(StaticCollider {
            min: Vec3::new(-half_extent, height - 1.0, -half_extent),
            max: Vec3::new(half_extent, height, half_extent),
            layer: COLLISION_LAYER_GROUND,
            entity: None,
        });
        self
    }

    /// Препятствие (камень, стена)
    pub fn with_obstacle(mut self, center: Vec3, half_extents: Vec3) -> Self {
        self.colliders
            .push(StaticCollider::from_center(center, half_extents, COLLISION_LAYER_OBSTACLES));
        self
    }

    /// Коллайдер угрозы, привязанный к entity (LOS луч разрешается в неё)
    pub fn with_threat_body(mut self, entity: Entity, center: Vec3, half_extents: Vec3) -> Self {
        self.colliders.push(
            StaticCollider::from_center(center, half_extents, COLLISION_LAYER_THREATS).with_entity(entity),
        );
        self
    }

    pub fn push(&mut self, collider: StaticCollider) {
        self.colliders.push(collider);
    }
}

impl WorldQuery for HeadlessWorld {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &CollisionFilter,
    ) -> Option<RayHit> {
        if max_distance <= 0.0 || !direction.is_finite() {
            return None;
        }

        self.colliders
            .iter()
            .filter(|collider| filter.accepts(collider.layer, collider.entity))
            .filter_map(|collider| {
                collider
                    .ray_distance(origin, direction, max_distance)
                    .map(|distance| (collider, distance))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(collider, distance)| RayHit {
                point: origin + direction * distance,
                distance,
                entity: collider.entity,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_layers::COLLISION_MASK_GROUND;

    #[test]
    fn test_ray_hits_ground_from_above() {
        let world = HeadlessWorld::new().with_ground(0.0, 50.0);
        let filter = CollisionFilter::new(COLLISION_MASK_GROUND);

        let hit = world
            .cast_ray(Vec3::new(1.0, 3.0, 2.0), Vec3::NEG_Y, 10.0, &filter)
            .expect("ground below");

        assert!((hit.distance - 3.0).abs() < 1e-5, "distance = {}", hit.distance);
        assert!(hit.point.y.abs() < 1e-5);
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let world = HeadlessWorld::new().with_ground(0.0, 50.0);
        let filter = CollisionFilter::new(COLLISION_MASK_GROUND);

        assert!(world.cast_ray(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, 2.0, &filter).is_none());
    }

    #[test]
    fn test_ray_picks_nearest_collider() {
        let world = HeadlessWorld::new()
            .with_obstacle(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(0.5))
            .with_obstacle(Vec3::new(0.0, 0.0, -2.0), Vec3::splat(0.5));
        let filter = CollisionFilter::new(COLLISION_LAYER_OBSTACLES);

        let hit = world
            .cast_ray(Vec3::ZERO, Vec3::NEG_Z, 10.0, &filter)
            .expect("obstacle ahead");
        assert!((hit.distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_filter_masks_out_layers_and_excluded_entity() {
        let threat = Entity::from_raw(7);
        let world = HeadlessWorld::new().with_threat_body(threat, Vec3::new(0.0, 0.0, -3.0), Vec3::splat(0.5));

        let ground_only = CollisionFilter::new(COLLISION_LAYER_GROUND);
        assert!(world.cast_ray(Vec3::ZERO, Vec3::NEG_Z, 10.0, &ground_only).is_none());

        let sight = CollisionFilter::new(COLLISION_LAYER_THREATS);
        assert_eq!(
            world.cast_ray(Vec3::ZERO, Vec3::NEG_Z, 10.0, &sight).and_then(|hit| hit.entity),
            Some(threat)
        );
        assert!(world
            .cast_ray(Vec3::ZERO, Vec3::NEG_Z, 10.0, &sight.excluding(threat))
            .is_none());
    }

    #[test]
    fn test_origin_inside_collider_hits_at_zero() {
        let world = HeadlessWorld::new().with_obstacle(Vec3::ZERO, Vec3::splat(1.0));
        let filter = CollisionFilter::new(COLLISION_LAYER_OBSTACLES);

        let hit = world.cast_ray(Vec3::ZERO, Vec3::X, 5.0, &filter).expect("inside");
        assert_eq!(hit.distance, 0.0);
    }
}
