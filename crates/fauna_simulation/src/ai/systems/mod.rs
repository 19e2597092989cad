//! AI systems (FSM tick, threat assignment, lifecycle)

pub mod fsm;
pub mod lifecycle;
pub mod threat;

// Re-export all systems
pub use fsm::*;
pub use lifecycle::*;
pub use threat::*;
