//! ECS Components для животных
//!
//! Организация по доменам:
//! - stats: per-species конфиг (AnimalStats, AnimalStatsHandle)
//! - threat: угрозы и lifecycle маркеры (Threat, ThreatSource, Dormant)
//!
//! FSM компоненты (AnimalBrain, Species) — в `crate::ai`,
//! sensor/physics компоненты — в `crate::sensors` / `crate::physics`.

pub mod stats;
pub mod threat;

// Re-exports для удобного импорта
pub use stats::*;
pub use threat::*;
