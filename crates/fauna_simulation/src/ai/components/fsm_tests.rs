//! Tests for FSM AI components.

use super::fsm::{AnimalBrain, AnimalState, AnimalStateKind};

#[test]
fn test_animal_brain_default() {
    let brain = AnimalBrain::default();
    assert_eq!(brain.kind(), AnimalStateKind::Idle);
    assert!(!brain.is_activated());
}

#[test]
fn test_idle_timer_logic() {
    let mut state = AnimalState::Idle { remaining: 2.0 };
    let delta = 0.5;

    state.advance(delta);
    assert_eq!(state, AnimalState::Idle { remaining: 1.5 });
    assert!(!state.is_expired());

    state.advance(delta);
    state.advance(delta);
    state.advance(delta);
    assert_eq!(state, AnimalState::Idle { remaining: 0.0 });
    assert!(state.is_expired()); // Idle завершен
}

#[test]
fn test_flee_timer_logic() {
    let mut state = AnimalState::Flee {
        elapsed: 0.0,
        duration: 1.0,
    };

    state.advance(0.75);
    assert!(!state.is_expired());

    state.advance(0.25);
    assert!(state.is_expired());
}

#[test]
fn test_wander_keeps_yaw_bias_while_advancing() {
    let mut state = AnimalState::Wander {
        elapsed: 0.0,
        duration: 3.0,
        yaw_bias_deg: -42.0,
    };

    state.advance(1.0);

    assert_eq!(
        state,
        AnimalState::Wander {
            elapsed: 1.0,
            duration: 3.0,
            yaw_bias_deg: -42.0,
        }
    );
    assert_eq!(state.kind(), AnimalStateKind::Wander);
}

#[test]
fn test_reset_returns_to_idle() {
    let mut brain = AnimalBrain {
        state: AnimalState::Graze {
            elapsed: 1.0,
            duration: 4.0,
        },
        activated: true,
    };

    brain.reset();

    assert_eq!(brain.kind(), AnimalStateKind::Idle);
    assert!(!brain.is_activated());
}

#[test]
fn test_state_kind_names() {
    let names: Vec<_> = AnimalStateKind::ALL.iter().map(|kind| kind.as_str()).collect();
    assert_eq!(names, ["Idle", "Wander", "Graze", "Flee"]);
}
