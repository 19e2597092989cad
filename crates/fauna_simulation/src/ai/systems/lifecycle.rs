//! Lifecycle: деактивация (Dormant) и повторная активация агентов.

use bevy::prelude::*;

use crate::ai::components::AnimalBrain;
use crate::components::Dormant;
use crate::physics::MovementInput;

/// Система: агент уснул → сбросить motion intent и FSM
///
/// FSM уже не тикает (фильтр `Without<Dormant>`), так что MovementInput
/// остался бы висеть с прошлого тика. Brain сбрасывается сразу здесь:
/// `Added<Dormant>` виден системе даже если FixedUpdate пропустил кадры,
/// а `RemovedComponents` живут только пару `app.update()`.
pub fn halt_dormant_animals(
    mut query: Query<(Entity, &mut AnimalBrain, Option<&mut MovementInput>), Added<Dormant>>,
) {
    for (entity, mut brain, input) in query.iter_mut() {
        if let Some(mut input) = input {
            input.clear();
        }
        brain.reset();
        crate::log(&format!("💤 Animal {:?}: dormant", entity));
    }
}

/// Система: Dormant снят → лог (первый тик FSM активирует Idle заново)
pub fn wake_animals(mut removed: RemovedComponents<Dormant>, brains: Query<&AnimalBrain, Without<Dormant>>) {
    for entity in removed.read() {
        // Entity могла быть despawned вместе с маркером
        if brains.contains(entity) {
            crate::log(&format!("⏰ Animal {:?}: reactivated", entity));
        }
    }
}
