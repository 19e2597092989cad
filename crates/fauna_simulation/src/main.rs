//! Headless симуляция FAUNA
//!
//! Поле с землёй и камнями, стадо (обычные животные + свиньи) и одна
//! угроза по центру. 1000 тиков, раз в 100 тиков — сводка по состояниям.

use std::collections::BTreeMap;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use fauna_simulation::{
    create_headless_app, log_info, set_log_level, spawn_animals, AnimalBrain, AnimalSpawner, AnimalStateKind,
    AnimalStats, AnimalStatsHandle, AnimalTemplate, HeadlessWorld, LogLevel, SensorConfig, Species, SpeciesProfile, Threat,
    ThreatSource,
};

fn build_world() -> HeadlessWorld {
    HeadlessWorld::new()
        .with_ground(0.0, 60.0)
        .with_obstacle(Vec3::new(6.0, 0.5, -4.0), Vec3::new(1.0, 1.0, 1.0))
        .with_obstacle(Vec3::new(-8.0, 0.5, 5.0), Vec3::new(2.0, 1.0, 0.5))
        .with_obstacle(Vec3::new(0.0, 0.5, 12.0), Vec3::new(3.0, 1.0, 0.5))
}

fn state_counts(world: &mut World) -> BTreeMap<AnimalStateKind, usize> {
    let mut counts: BTreeMap<_, _> = AnimalStateKind::ALL.iter().map(|kind| (*kind, 0)).collect();
    let mut query = world.query::<&AnimalBrain>();
    for brain in query.iter(world) {
        *counts.entry(brain.kind()).or_default() += 1;
    }
    counts
}

fn main() {
    let seed = 42;
    println!("Starting FAUNA headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    set_log_level(LogLevel::Info);

    let ground = build_world();
    let stats = AnimalStatsHandle::new(AnimalStats::default());
    let spawner = AnimalSpawner {
        count: 5,
        ..default()
    };

    {
        let world = app.world_mut();
        world.insert_resource(ground.clone());

        // Угроза стоит в центре поля
        world.spawn((Transform::from_xyz(0.0, 0.0, 0.0), ThreatSource));

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        {
            let mut commands = world.commands();
            for species in [SpeciesProfile::generic(), SpeciesProfile::pig()] {
                let template = AnimalTemplate {
                    stats: stats.clone(),
                    species: Species::new(species),
                    sensors: SensorConfig::default(),
                    threat: Threat::nearest(25.0),
                };
                spawn_animals(&mut commands, &ground, &spawner, &template, &mut rng);
            }
        }
        world.flush();
    }

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let counts = state_counts(app.world_mut());
            let summary: Vec<String> = counts
                .iter()
                .map(|(kind, count)| format!("{}={}", kind.as_str(), count))
                .collect();
            log_info(&format!("📊 Tick {}: {}", tick, summary.join(" ")));
        }
    }

    println!("Simulation complete!");
}
