//! Edge routing, relay outputs, and hardware initialisation.

pub mod hw_init;
pub mod hw_timer;
pub mod input;
pub mod relay;
