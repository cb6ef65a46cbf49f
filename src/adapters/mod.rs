//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                 |
//! |------------|---------------|-----------------------------|
//! | `config`   | ConfigSource  | Built-in table / JSON blob  |
//! | `log_sink` | EventSink     | Serial log output           |
//! | `time`     | Clock         | ESP32 system timer          |
//!
//! The relay GPIO adapter (`RelayPort`) lives in
//! [`drivers::relay`](crate::drivers::relay) next to the pin drivers.

pub mod config;
pub mod log_sink;
pub mod time;
