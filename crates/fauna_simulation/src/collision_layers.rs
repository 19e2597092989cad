//! Collision Layers Constants
//!
//! Centralised битовые маски для physics слоёв и sensor фильтров.
//!
//! ## Архитектура:
//! - **Layer:** на каком слое находится collider
//! - **Mask:** какие слои видит raycast / с какими коллайдит тело
//!
//! ## Layers:
//! - Layer 1 (0b1 = 1): Ground (terrain, пол)
//! - Layer 2 (0b10 = 2): Obstacles (камни, стены, деревья)
//! - Layer 3 (0b100 = 4): Animals (kinematic тела агентов)
//! - Layer 4 (0b1000 = 8): Threats (игрок, хищники)

use bevy_rapier3d::prelude::{CollisionGroups, Group};

// ============================================================================
// Layer Битовые Маски (на каком слое collider находится)
// ============================================================================

/// Layer 1: Ground (terrain)
pub const COLLISION_LAYER_GROUND: u32 = 0b1; // 1

/// Layer 2: Obstacles (static blockers)
pub const COLLISION_LAYER_OBSTACLES: u32 = 0b10; // 2

/// Layer 3: Animals (kinematic bodies)
pub const COLLISION_LAYER_ANIMALS: u32 = 0b100; // 4

/// Layer 4: Threats (player / predators)
pub const COLLISION_LAYER_THREATS: u32 = 0b1000; // 8

// ============================================================================
// Mask Битовые Маски (что видит raycast)
// ============================================================================

/// Mask: LOS + obstacle-ahead
///
/// Threat включён в маску: луч, упёршийся в саму цель, = цель видна.
pub const COLLISION_MASK_SIGHT: u32 = COLLISION_LAYER_OBSTACLES | COLLISION_LAYER_THREATS;

/// Mask: ground probes (cliff check, ground snap)
///
/// Верх препятствия — тоже опора.
pub const COLLISION_MASK_GROUND: u32 = COLLISION_LAYER_GROUND | COLLISION_LAYER_OBSTACLES;

/// Mask: kinematic тело животного коллайдит с миром и друг с другом
pub const COLLISION_MASK_ANIMALS: u32 =
    COLLISION_LAYER_GROUND | COLLISION_LAYER_OBSTACLES | COLLISION_LAYER_ANIMALS | COLLISION_LAYER_THREATS;

// ============================================================================
// Helper Functions
// ============================================================================

/// Rapier groups для kinematic тела животного
pub fn animal_groups() -> CollisionGroups {
    CollisionGroups::new(
        Group::from_bits_truncate(COLLISION_LAYER_ANIMALS),
        Group::from_bits_truncate(COLLISION_MASK_ANIMALS),
    )
}

/// Rapier groups для raycast query: memberships = все, filters = mask
pub fn query_groups(mask: u32) -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask))
}

/// Получить название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_GROUND => "Ground",
        COLLISION_LAYER_OBSTACLES => "Obstacles",
        COLLISION_LAYER_ANIMALS => "Animals",
        COLLISION_LAYER_THREATS => "Threats",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sight_mask_excludes_ground_and_animals() {
        assert_eq!(COLLISION_MASK_SIGHT & COLLISION_LAYER_GROUND, 0);
        assert_eq!(COLLISION_MASK_SIGHT & COLLISION_LAYER_ANIMALS, 0);
        assert_ne!(COLLISION_MASK_SIGHT & COLLISION_LAYER_THREATS, 0);
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(get_layer_name(COLLISION_LAYER_GROUND), "Ground");
        assert_eq!(get_layer_name(0b1_0000), "Unknown");
    }
}
