//! Animal AI module
//!
//! FSM (Idle/Wander/Graze/Flee) + species specialization + sensors.
//! Порядок внутри `AnimalSet::Think`:
//! 1. halt_dormant_animals / wake_animals — lifecycle маркеры
//! 2. assign_nearest_threats — обновление Threat ссылок
//! 3. animal_fsm_* — один шаг FSM на агента (пишет MovementInput)

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod species;
pub mod systems;


// Re-export основных типов
pub use brain::{enter_state, next_after_expiry, TickContext};
pub use components::{AnimalBrain, AnimalState, AnimalStateKind, StateTransition, TransitionCause};
pub use species::{FleeCheck, FleePolicy, Species, SpeciesBehavior, SpeciesProfile};
pub use systems::{animal_fsm_headless, animal_fsm_rapier, assign_nearest_threats, halt_dormant_animals, wake_animals};

use crate::components::{Dormant, Threat, ThreatSource};
use crate::sensors::SensorConfig;
use crate::{AnimalSet, WorldBackend};

/// Animal AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// `backend` выбирает, чем FSM смотрит на мир (HeadlessWorld или Rapier).
#[derive(Default)]
pub struct AnimalAIPlugin {
    pub backend: WorldBackend,
}

impl Plugin for AnimalAIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AnimalBrain>()
            .register_type::<Threat>()
            .register_type::<ThreatSource>()
            .register_type::<Dormant>()
            .register_type::<SensorConfig>();

        let lifecycle = (halt_dormant_animals, wake_animals, assign_nearest_threats).chain();

        match self.backend {
            WorldBackend::Headless => {
                app.add_systems(
                    FixedUpdate,
                    (lifecycle, animal_fsm_headless)
                        .chain() // Последовательное выполнение для детерминизма
                        .in_set(AnimalSet::Think),
                );
            }
            WorldBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (lifecycle, animal_fsm_rapier).chain().in_set(AnimalSet::Think),
                );
            }
        }
    }
}
