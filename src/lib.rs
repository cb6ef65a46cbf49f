//! Relay board firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod ids;
pub mod pins;
pub mod relays;
pub mod timers;

pub mod adapters;
pub mod drivers;

pub use app::behavior::Behavior;
pub use app::service::{InputNotice, RelayController};
pub use app::status::{RelaySnapshot, RelayStatus, status_json};
pub use drivers::input::{handle_button, handle_edge};
pub use error::{ConfigError, Error, Result};
pub use events::{Direction, Event, EventQueue, INPUT_QUEUE, Message};
pub use ids::{ButtonId, InputId, RelayId};
