//! Locomotion adapter — контракт между FSM и physics слоем
//!
//! FSM не владеет позой: читает position/rotation через адаптер и отдаёт
//! intent'ы (move_forward, rotate, rotate_toward). Заблокированное движение
//! молча пропускается — агент просто не продвигается в этот тик.

use bevy::prelude::*;

use super::movement::{KinematicController, MovementInput};
use crate::sensors::{CollisionFilter, WorldQuery};

/// Высота, с которой пробуем путь вперёд (чтобы не цеплять землю)
const MOTION_PROBE_HEIGHT: f32 = 0.3;

/// Locomotion контракт
pub trait Locomotion {
    fn position(&self) -> Vec3;

    fn rotation(&self) -> Quat;

    /// Forward агента (Bevy convention: -Z)
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Intent: двигаться вдоль `direction` со скоростью `speed` (m/s) в этот тик
    fn move_forward(&mut self, direction: Vec3, speed: f32);

    /// Повернуть вокруг world Y на `yaw_delta_degrees`
    fn rotate(&mut self, yaw_delta_degrees: f32);

    /// Повернуть к `target` не больше чем на `max_degrees` (shortest arc)
    fn rotate_toward(&mut self, target: Quat, max_degrees: f32);
}

/// Shortest-arc поворот с ограничением угла
///
/// `angle_between` уже берёт кратчайшую дугу (|dot|), slerp тоже.
pub fn rotate_towards_capped(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let max_radians = max_degrees.max(0.0).to_radians();
    let angle = from.angle_between(to);
    if !angle.is_finite() || angle <= max_radians {
        return to;
    }
    from.slerp(to, max_radians / angle).normalize()
}

/// Kinematic адаптер: Transform + MovementInput
///
/// - Повороты применяются к Transform сразу
/// - Движение пишется в MovementInput (интегрирует physics pipeline)
/// - Перед движением пробуем путь по obstacle фильтру: упёрлись → intent отброшен
pub struct KinematicLocomotion<'a, W: WorldQuery + ?Sized> {
    transform: &'a mut Transform,
    input: &'a mut MovementInput,
    controller: &'a KinematicController,
    world: &'a W,
    blockers: CollisionFilter,
    delta: f32,
}

impl<'a, W: WorldQuery + ?Sized> KinematicLocomotion<'a, W> {
    pub fn new(
        transform: &'a mut Transform,
        input: &'a mut MovementInput,
        controller: &'a KinematicController,
        world: &'a W,
        blockers: CollisionFilter,
        delta: f32,
    ) -> Self {
        Self {
            transform,
            input,
            controller,
            world,
            blockers,
            delta,
        }
    }

    fn is_blocked(&self, direction: Vec3, speed: f32) -> bool {
        let origin = self.transform.translation + Vec3::Y * MOTION_PROBE_HEIGHT;
        let reach = speed * self.delta + self.controller.body_radius;
        self.world
            .cast_ray(origin, direction, reach, &self.blockers)
            .is_some()
    }
}

impl<W: WorldQuery + ?Sized> Locomotion for KinematicLocomotion<'_, W> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn move_forward(&mut self, direction: Vec3, speed: f32) {
        // Движение только в плоскости земли, высоту держит ground snap
        let planar = Vec3::new(direction.x, 0.0, direction.z);
        let Ok(direction) = Dir3::new(planar) else {
            return;
        };
        if speed <= 0.0 || self.is_blocked(*direction, speed) {
            return;
        }

        self.input.direction = *direction;
        self.input.speed = speed;
    }

    fn rotate(&mut self, yaw_delta_degrees: f32) {
        if yaw_delta_degrees.is_finite() {
            self.transform.rotate_y(yaw_delta_degrees.to_radians());
        }
    }

    fn rotate_toward(&mut self, target: Quat, max_degrees: f32) {
        self.transform.rotation = rotate_towards_capped(self.transform.rotation, target, max_degrees);
    }
}
