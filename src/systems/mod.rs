//! Per-frame systems run by the hero pipeline. They only learn what the
//! current state permits through its capability queries.

mod carried;
mod detectors;
mod ground;
mod movement;

pub use carried::carried_object_system;
pub use detectors::detector_system;
pub use ground::ground_system;
pub use movement::movement_system;
