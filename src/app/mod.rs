//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the control rules for the relay board: the
//! input → relay mapping table, the behavior state machine, the
//! controller that applies it, and the status snapshot.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod behavior;
pub mod events;
pub mod mapping;
pub mod ports;
pub mod service;
pub mod status;
