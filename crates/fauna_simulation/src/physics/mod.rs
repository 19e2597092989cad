//! Physics module
//!
//! Kinematic контроллер, locomotion адаптер для FSM, ground snap.

pub mod locomotion;
pub mod movement;

// Re-export основных типов
pub use locomotion::{rotate_towards_capped, KinematicLocomotion, Locomotion};
pub use movement::{
    spawn_kinematic_body, KinematicController, KinematicControllerPlugin, MovementInput, PhysicsBody,
};
