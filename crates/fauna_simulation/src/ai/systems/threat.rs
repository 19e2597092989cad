//! Threat assignment: ближайший ThreatSource для агентов с `ThreatTracking::Nearest`.

use bevy::prelude::*;

use crate::ai::components::AnimalBrain;
use crate::components::{Dormant, Threat, ThreatSource, ThreatTracking};

/// Ближайшая угроза в радиусе. При равной дистанции — меньший Entity index
pub fn nearest_threat(
    position: Vec3,
    scan_radius: f32,
    sources: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<Entity> {
    let radius_squared = scan_radius * scan_radius;

    sources
        .into_iter()
        .map(|(entity, source)| (entity, position.distance_squared(source)))
        .filter(|(_, distance_squared)| *distance_squared <= radius_squared)
        .min_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.index().cmp(&b.index())))
        .map(|(entity, _)| entity)
}

/// Система: обновление `Threat::entity` для Nearest tracking
///
/// Manual tracking не трогаем — ссылку пишет хост.
pub fn assign_nearest_threats(
    mut agents: Query<(Entity, &Transform, &mut Threat), (With<AnimalBrain>, Without<Dormant>)>,
    sources: Query<(Entity, &Transform), (With<ThreatSource>, Without<AnimalBrain>)>,
) {
    for (entity, transform, mut threat) in agents.iter_mut() {
        let ThreatTracking::Nearest { scan_radius } = threat.tracking else {
            continue;
        };

        let nearest = nearest_threat(
            transform.translation,
            scan_radius,
            sources.iter().map(|(source, transform)| (source, transform.translation)),
        );

        if threat.entity != nearest {
            match nearest {
                Some(source) => crate::log(&format!("🎯 Animal {:?}: tracking threat {:?}", entity, source)),
                None => crate::log(&format!("🌿 Animal {:?}: no threat in range", entity)),
            }
            threat.entity = nearest;
        }
    }
}
