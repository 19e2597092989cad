//! Spawn helpers: одно животное и стадо по площади
//!
//! Стадо спавнится на случайных XZ внутри прямоугольника, каждая особь
//! опускается на землю лучом сверху (как при ручной расстановке в редакторе).

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AnimalBrain, Species};
use crate::collision_layers::COLLISION_MASK_GROUND;
use crate::components::{AnimalStatsHandle, Threat};
use crate::physics::spawn_kinematic_body;
use crate::sensors::{snap_to_ground, CollisionFilter, SensorConfig, WorldQuery};

/// Общие для вида/стада данные агента
#[derive(Debug, Clone)]
pub struct AnimalTemplate {
    pub stats: AnimalStatsHandle,
    pub species: Species,
    pub sensors: SensorConfig,
    pub threat: Threat,
}

/// Параметры площади спавна
#[derive(Debug, Clone, Copy)]
pub struct AnimalSpawner {
    pub count: usize,
    /// Полуразмер прямоугольника по X/Z вокруг (0, 0)
    pub half_extent: Vec2,
    /// Высота, от которой ищем землю
    pub base_y: f32,
    pub ground_filter: CollisionFilter,
    pub probe_up: f32,
    pub probe_down: f32,
}

impl Default for AnimalSpawner {
    fn default() -> Self {
        Self {
            count: 10,
            half_extent: Vec2::splat(20.0),
            base_y: 0.0,
            ground_filter: CollisionFilter::new(COLLISION_MASK_GROUND),
            probe_up: 50.0,
            probe_down: 200.0,
        }
    }
}

/// Спавн одного животного: kinematic тело + FSM + данные шаблона
pub fn spawn_animal(commands: &mut Commands, template: &AnimalTemplate, position: Vec3) -> Entity {
    let entity = spawn_kinematic_body(commands, position);

    commands.entity(entity).insert((
        AnimalBrain::new(),
        template.stats.clone(),
        template.species.clone(),
        template.sensors.clone(),
        template.threat,
    ));

    entity
}

/// Спавн стада. Нет земли под точкой → особь остаётся на `base_y`
pub fn spawn_animals<W, R>(
    commands: &mut Commands,
    world: &W,
    spawner: &AnimalSpawner,
    template: &AnimalTemplate,
    rng: &mut R,
) -> Vec<Entity>
where
    W: WorldQuery + ?Sized,
    R: Rng + ?Sized,
{
    (0..spawner.count)
        .map(|_| {
            let x = rng.gen_range(-spawner.half_extent.x..=spawner.half_extent.x);
            let z = rng.gen_range(-spawner.half_extent.y..=spawner.half_extent.y);
            let position = snap_to_ground(
                Vec3::new(x, spawner.base_y, z),
                &spawner.ground_filter,
                spawner.probe_up,
                spawner.probe_down,
                world,
            );

            spawn_animal(commands, template, position)
        })
        .collect()
}
