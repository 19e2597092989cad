//! Sensor queries: visibility, cliff, obstacle, ground snap
//!
//! Pure функции поверх `WorldQuery`. Вырожденная геометрия (нулевые векторы)
//! обрабатывается явно, NaN наружу не уходит.

use bevy::prelude::*;

use super::{CollisionFilter, WorldQuery};

/// Высота cliff probe над позицией агента (метры)
const CLIFF_PROBE_LIFT: f32 = 0.1;

/// Ниже этой дистанции цель считается "в глазах" — направление не определено
const MIN_SIGHT_DISTANCE: f32 = 1e-4;

/// Цель для visibility проверки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightTarget {
    pub entity: Entity,
    pub position: Vec3,
}

/// Видит ли глаз цель: range → FOV → occlusion raycast
///
/// - `view_angle` — полная ширина конуса в градусах (проверяем половину)
/// - Луч до цели: попали в саму цель или никуда → видно; в другое → заслонено
pub fn can_see_target<W: WorldQuery + ?Sized>(
    eye_origin: Vec3,
    eye_forward: Vec3,
    target: Option<SightTarget>,
    view_radius: f32,
    view_angle: f32,
    obstacle_filter: &CollisionFilter,
    world: &W,
) -> bool {
    let Some(target) = target else {
        return false;
    };

    let to_target = target.position - eye_origin;
    let distance = to_target.length();
    if distance > view_radius {
        return false;
    }

    if distance < MIN_SIGHT_DISTANCE {
        return true;
    }

    let direction = to_target / distance;
    if eye_forward.length_squared() > 0.0 {
        let angle_deg = eye_forward.angle_between(direction).to_degrees();
        if angle_deg > view_angle * 0.5 {
            return false;
        }
    }

    match world.cast_ray(eye_origin, direction, distance, obstacle_filter) {
        Some(hit) => hit.entity == Some(target.entity),
        None => true,
    }
}

/// Обрыв впереди: луч вниз из точки перед агентом не нашёл землю
pub fn is_cliff_ahead<W: WorldQuery + ?Sized>(
    position: Vec3,
    forward: Vec3,
    ground_filter: &CollisionFilter,
    forward_offset: f32,
    drop_distance: f32,
    world: &W,
) -> bool {
    let probe = position + forward * forward_offset + Vec3::Y * CLIFF_PROBE_LIFT;
    world
        .cast_ray(probe, Vec3::NEG_Y, drop_distance, ground_filter)
        .is_none()
}

/// Препятствие прямо по курсу в пределах `distance`
pub fn is_obstacle_ahead<W: WorldQuery + ?Sized>(
    eye_origin: Vec3,
    eye_forward: Vec3,
    obstacle_filter: &CollisionFilter,
    distance: f32,
    world: &W,
) -> bool {
    let Ok(direction) = Dir3::new(eye_forward) else {
        return false;
    };
    world
        .cast_ray(eye_origin, *direction, distance, obstacle_filter)
        .is_some()
}

/// Прижать позицию к земле. Нет земли → позиция без изменений (никогда не фейлится)
pub fn snap_to_ground<W: WorldQuery + ?Sized>(
    position: Vec3,
    ground_filter: &CollisionFilter,
    up_offset: f32,
    down_distance: f32,
    world: &W,
) -> Vec3 {
    let origin = position + Vec3::Y * up_offset;
    match world.cast_ray(origin, Vec3::NEG_Y, down_distance, ground_filter) {
        Some(hit) => hit.point,
        None => position,
    }
}
