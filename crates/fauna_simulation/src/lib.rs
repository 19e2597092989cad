//! FAUNA Simulation Core
//!
//! ECS-симуляция животных на Bevy 0.16
//!
//! Слои:
//! - sensors = stateless ray-cast запросы (видимость, обрыв, препятствие, земля)
//! - ai = FSM (Idle/Wander/Graze/Flee) + species specialization
//! - physics = locomotion adapter + kinematic движение + ground snap
//!
//! Collision world подключается через `WorldBackend`: headless AABB мир
//! (тесты, headless runner) или Rapier context (игровой хост).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod collision_layers;
pub mod components;
pub mod logger;
pub mod physics;
pub mod sensors;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::{
    AnimalAIPlugin, AnimalBrain, AnimalState, AnimalStateKind, FleePolicy, Species, SpeciesBehavior, SpeciesProfile,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel, LogPrinter};
pub use physics::{KinematicController, KinematicControllerPlugin, Locomotion, MovementInput, PhysicsBody};
pub use sensors::{CollisionFilter, HeadlessWorld, SensorConfig, WorldQuery};
pub use spawn::{spawn_animal, spawn_animals, AnimalSpawner, AnimalTemplate};

/// Частота simulation tick (Hz)
pub const FIXED_HZ: f64 = 60.0;

/// Фазы тика животных внутри FixedUpdate
///
/// Think (FSM пишет MovementInput) → Move (input → velocity → Transform → ground).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalSet {
    Think,
    Move,
}

/// Чем сенсоры и ground snap смотрят на мир
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorldBackend {
    /// `HeadlessWorld` ресурс (AABB коллайдеры)
    #[default]
    Headless,
    /// Rapier context (хост добавляет `RapierPhysicsPlugin`)
    Rapier,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub backend: WorldBackend,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .configure_sets(FixedUpdate, (AnimalSet::Think, AnimalSet::Move).chain())
            // Подсистемы
            .add_plugins((
                AnimalAIPlugin { backend: self.backend },
                KinematicControllerPlugin { backend: self.backend },
            ));

        // Детерминистичный RNG (seed по умолчанию), если хост не поставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную: один `app.update()` = ровно один fixed tick
/// (первый update только инициализирует часы, delta = 0).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / FIXED_HZ)))
        .insert_resource(HeadlessWorld::default())
        .add_plugins(SimulationPlugin::default());

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
