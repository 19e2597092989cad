//! FSM AI systems (tick каждого активного животного).

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::brain::TickContext;
use crate::ai::components::{AnimalBrain, StateTransition, TransitionCause};
use crate::ai::species::{Species, SpeciesBehavior, SpeciesProfile};
use crate::components::{AnimalStatsHandle, Dormant, Threat};
use crate::physics::{KinematicController, KinematicLocomotion, MovementInput};
use crate::sensors::{HeadlessWorld, RapierWorldQuery, SensorConfig, SightTarget, WorldQuery};
use crate::DeterministicRng;

/// Всё, что FSM система читает/пишет у агента
///
/// Locomotion существует только при MovementInput + KinematicController.
type AgentQueryData = (
    Entity,
    &'static mut AnimalBrain,
    &'static mut Transform,
    Option<&'static mut MovementInput>,
    Option<&'static KinematicController>,
    Option<&'static AnimalStatsHandle>,
    Option<&'static SensorConfig>,
    Option<&'static Species>,
    Option<&'static Threat>,
);

pub type AgentQuery<'w, 's> = Query<'w, 's, AgentQueryData, Without<Dormant>>;

/// Позиции угроз. Угроза не может сама быть животным (конфликт по Transform)
pub type ThreatQuery<'w, 's> = Query<'w, 's, &'static Transform, Without<AnimalBrain>>;

/// Резолв non-owning ссылки: протухшая entity = угрозы нет
fn resolve_threat(threat: Option<&Threat>, threats: &ThreatQuery) -> Option<SightTarget> {
    let entity = threat?.entity?;
    let transform = threats.get(entity).ok()?;

    Some(SightTarget {
        entity,
        position: transform.translation,
    })
}

fn log_transition(entity: Entity, transition: &StateTransition) {
    let icon = match transition.cause {
        TransitionCause::Activated => "🐣",
        TransitionCause::Expired => "🔁",
        TransitionCause::ThreatSighted => "😱",
        TransitionCause::MissingStats => "⚠️",
    };

    let message = format!(
        "{} Animal {:?}: {} → {} ({:?})",
        icon,
        entity,
        transition.from.as_str(),
        transition.to.as_str(),
        transition.cause
    );

    if transition.cause == TransitionCause::MissingStats {
        crate::log_warning(&message);
    } else {
        crate::log(&message);
    }
}

/// Тик всех активных агентов поверх любого WorldQuery backend'а
pub fn tick_animals<W: WorldQuery>(
    world: &W,
    agents: &mut AgentQuery,
    threats: &ThreatQuery,
    rng: &mut ChaCha8Rng,
    delta: f32,
) {
    let fallback_species = SpeciesProfile::generic();

    for (entity, mut brain, mut transform, input, controller, stats, sensors, species, threat) in agents.iter_mut() {
        let sensors = sensors.map(|sensors| sensors.for_agent(entity));
        let ctx = TickContext {
            stats: stats.map(|handle| handle.0.as_ref()),
            sensors: sensors.as_ref(),
            species: species.map_or(&fallback_species as &dyn SpeciesBehavior, Species::behavior),
            threat: resolve_threat(threat, threats),
            world,
        };

        let transitions = match (input, controller, sensors.as_ref()) {
            (Some(mut input), Some(controller), sensors) => {
                // Intent живёт ровно один тик
                input.clear();

                let blockers = sensors.map_or_else(
                    || SensorConfig::default().obstacle_filter.excluding(entity),
                    |sensors| sensors.obstacle_filter,
                );
                let mut body = KinematicLocomotion::new(
                    transform.as_mut(),
                    input.as_mut(),
                    controller,
                    world,
                    blockers,
                    delta,
                );
                brain.step(&ctx, Some(&mut body), rng, delta)
            }
            _ => brain.step(&ctx, None, rng, delta),
        };

        for transition in &transitions {
            log_transition(entity, transition);
        }
    }
}

/// Система: FSM тик (headless backend)
///
/// Нет HeadlessWorld ресурса → пустой мир (ни земли, ни препятствий).
pub fn animal_fsm_headless(
    world: Option<Res<HeadlessWorld>>,
    mut agents: AgentQuery,
    threats: ThreatQuery,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let empty = HeadlessWorld::default();
    let world = world.as_deref().unwrap_or(&empty);

    tick_animals(world, &mut agents, &threats, &mut rng.rng, time.delta_secs());
}

/// Система: FSM тик (Rapier backend)
pub fn animal_fsm_rapier(
    rapier: ReadRapierContext,
    mut agents: AgentQuery,
    threats: ThreatQuery,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    tick_animals(
        &RapierWorldQuery::new(&context),
        &mut agents,
        &threats,
        &mut rng.rng,
        time.delta_secs(),
    );
}
