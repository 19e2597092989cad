//! Rapier backend для WorldQuery
//!
//! Оборачивает `RapierContext` (из `ReadRapierContext::single()`).
//! Маска фильтра → `CollisionGroups` (memberships = ALL, filters = mask).

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{CollisionFilter, RayHit, WorldQuery};
use crate::collision_layers::query_groups;

/// WorldQuery поверх Rapier query pipeline
pub struct RapierWorldQuery<'a, 'w> {
    context: &'a RapierContext<'w>,
}

impl<'a, 'w> RapierWorldQuery<'a, 'w> {
    pub fn new(context: &'a RapierContext<'w>) -> Self {
        Self { context }
    }
}

impl WorldQuery for RapierWorldQuery<'_, '_> {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &CollisionFilter,
    ) -> Option<RayHit> {
        let mut query_filter = QueryFilter::new().groups(query_groups(filter.mask));
        if let Some(excluded) = filter.exclude {
            query_filter = query_filter.exclude_collider(excluded);
        }

        // solid = true: луч изнутри коллайдера попадает на toi = 0
        self.context
            .cast_ray(origin, direction, max_distance, true, query_filter)
            .map(|(entity, distance)| RayHit {
                point: origin + direction * distance,
                distance,
                entity: Some(entity),
            })
    }
}
