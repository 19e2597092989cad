//! Kinematic контроллер для животных
//!
//! Архитектура:
//! - Rapier для коллизий (RigidBody::KinematicPositionBased)
//! - Custom velocity integration (не используем Rapier forces)
//! - FSM пишет MovementInput → velocity → Transform → ground snap
//!
//! Детерминизм: fixed timestep (60Hz), без зависимости от порядка систем внутри тика

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::collision_layers::animal_groups;
use crate::sensors::{HeadlessWorld, RapierWorldQuery, SensorConfig, WorldQuery};
use crate::AnimalSet;

/// Kinematic контроллер компонент
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicController {
    /// Радиус тела (метры) — запас для проверки пути вперёд
    pub body_radius: f32,
    /// Стоит ли на земле (обновляется ground snap'ом)
    pub grounded: bool,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            body_radius: 0.4,
            grounded: false,
        }
    }
}

/// Входные данные для движения (intent на текущий тик)
///
/// Сбрасывается перед каждым шагом FSM — команда живёт ровно один тик.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    /// Направление движения (normalized, горизонтальное)
    pub direction: Vec3,
    /// Скорость (m/s)
    pub speed: f32,
}

impl MovementInput {
    pub fn clear(&mut self) {
        self.direction = Vec3::ZERO;
        self.speed = 0.0;
    }
}

/// Текущая скорость тела (m/s)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

/// Система применения движения от input
pub fn apply_movement_input(mut query: Query<(&MovementInput, &mut PhysicsBody)>) {
    for (input, mut body) in query.iter_mut() {
        if input.direction.length_squared() > 0.01 {
            let direction = input.direction.normalize();
            body.velocity.x = direction.x * input.speed;
            body.velocity.z = direction.z * input.speed;
        } else {
            // Останавливаем горизонтальное движение (трение)
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
        }
    }
}

/// Система интеграции velocity → Transform
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform), With<KinematicController>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        if body.velocity != Vec3::ZERO {
            transform.translation += body.velocity * delta;
        }
    }
}

fn snap_bodies<W: WorldQuery + ?Sized>(
    world: &W,
    query: &mut Query<(Entity, &SensorConfig, &mut KinematicController, &mut Transform)>,
) {
    for (entity, sensors, mut controller, mut transform) in query.iter_mut() {
        let sensors = sensors.for_agent(entity);
        let origin = transform.translation + Vec3::Y * sensors.ground_snap_up;

        // Нет земли под ногами → оставляем позицию как есть (не падаем в пустоту)
        let Some(hit) = world.cast_ray(origin, Vec3::NEG_Y, sensors.ground_snap_down, &sensors.ground_filter) else {
            controller.grounded = false;
            continue;
        };

        controller.grounded = true;
        if hit.point != transform.translation {
            transform.translation = hit.point;
        }
    }
}

/// Ground snap (headless backend)
pub fn snap_to_ground_headless(
    world: Res<HeadlessWorld>,
    mut query: Query<(Entity, &SensorConfig, &mut KinematicController, &mut Transform)>,
) {
    snap_bodies(world.as_ref(), &mut query);
}

/// Ground snap (Rapier backend)
pub fn snap_to_ground_rapier(
    rapier: ReadRapierContext,
    mut query: Query<(Entity, &SensorConfig, &mut KinematicController, &mut Transform)>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };
    snap_bodies(&RapierWorldQuery::new(&context), &mut query);
}

/// Plugin для kinematic контроллера
///
/// Системы в `AnimalSet::Move` (после FSM): input → velocity → transform → ground.
#[derive(Default)]
pub struct KinematicControllerPlugin {
    pub backend: crate::WorldBackend,
}

impl Plugin for KinematicControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (apply_movement_input, integrate_velocity_to_transform)
                .chain()
                .in_set(AnimalSet::Move),
        );

        match self.backend {
            crate::WorldBackend::Headless => {
                app.add_systems(
                    FixedUpdate,
                    snap_to_ground_headless
                        .after(integrate_velocity_to_transform)
                        .in_set(AnimalSet::Move),
                );
            }
            crate::WorldBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    snap_to_ground_rapier
                        .after(integrate_velocity_to_transform)
                        .in_set(AnimalSet::Move),
                );
            }
        }
    }
}

/// Spawn helper: kinematic тело животного
///
/// - Transform
/// - PhysicsBody + KinematicController + MovementInput
/// - Rapier: RigidBody + Collider (capsule) + groups
pub fn spawn_kinematic_body(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            PhysicsBody::default(),
            KinematicController::default(),
            MovementInput::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.3, 0.4),
            animal_groups(),
        ))
        .id()
}
