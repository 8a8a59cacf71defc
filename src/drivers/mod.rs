//! Actuator drivers and one-shot peripheral initialisation.

pub mod hw_init;
pub mod indicator;
pub mod relay;
