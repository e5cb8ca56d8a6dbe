//! Actuator drivers, feedback rendering and hardware initialisation.

pub mod feedback;
pub mod hw_init;
pub mod light;
pub mod pulse;
pub mod tone;
