//! Application core: pure domain logic, zero I/O.
//!
//! The detection loop, its feedback sequencing and the hardware lifecycle.
//! All interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod lifecycle;
pub mod ports;
pub mod service;
