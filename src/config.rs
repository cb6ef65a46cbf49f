//! Board configuration
//!
//! Relay names and the input → relay mapping table.  The default matches
//! the table the board ships with; a [`ConfigSource`](crate::app::ports::ConfigSource)
//! adapter may supply a different one at startup.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::ids::{INPUT_COUNT, RELAY_COUNT};

/// Maximum length of a relay name in bytes.
pub const NAME_LEN: usize = 16;
/// Maximum length of a behavior name in bytes.
pub const BEHAVIOR_LEN: usize = 24;

/// Default debounce interval, shared by inputs and panel buttons.
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;
/// Default period of the timer tick that drives auto-off expiry.
pub const DEFAULT_TICK_MS: u32 = 100;

pub type RelayName = String<NAME_LEN>;

/// One row of the relay table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// 1-based relay id.
    pub id: u8,
    pub name: RelayName,
}

/// One row of the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// 1-based input id.
    pub input: u8,
    /// Name of the relay this input drives (looked up in the relay table).
    pub relay: RelayName,
    /// Duration for timed behaviors, in milliseconds.
    pub duration_ms: u32,
    /// `Toggle`, `Timed`, `Timer_resets` or `On_while_activated`.
    pub behavior: String<BEHAVIOR_LEN>,
}

impl RelayConfig {
    pub fn new(id: u8, name: &str) -> Self {
        Self {
            id,
            name: bounded(name),
        }
    }
}

impl InputConfig {
    pub fn new(input: u8, relay: &str, duration_ms: u32, behavior: &str) -> Self {
        Self {
            input,
            relay: bounded(relay),
            duration_ms,
            behavior: bounded(behavior),
        }
    }
}

/// Complete board configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub relays: Vec<RelayConfig, RELAY_COUNT>,
    pub inputs: Vec<InputConfig, INPUT_COUNT>,
    /// Minimum gap between two accepted edges of the same direction (ms).
    pub debounce_ms: u32,
    /// Period of the timer tick pushed by the hardware timer (ms).
    pub tick_ms: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        const RELAYS: [&str; RELAY_COUNT] = [
            "Hall", "Living", "Kitchen", "Dining", "Attic", "Cellar", "Patio", "Toilet",
        ];
        const INPUTS: [(&str, u32, &str); INPUT_COUNT] = [
            ("Hall", 12_000, "Timed"),
            ("Living", 36_000, "Timed"),
            ("Kitchen", 0, "Toggle"),
            ("Dining", 36_000, "Timed"),
            ("Attic", 36_000, "Timed"),
            ("Cellar", 36_000, "Timed"),
            ("Patio", 3_600, "Timer_resets"),
            ("Toilet", 0, "On_while_activated"),
        ];

        let mut relays = Vec::new();
        for (i, name) in RELAYS.iter().enumerate() {
            // Capacity equals RELAY_COUNT, push cannot fail.
            let _ = relays.push(RelayConfig::new(i as u8 + 1, name));
        }
        let mut inputs = Vec::new();
        for (i, (relay, duration_ms, behavior)) in INPUTS.iter().enumerate() {
            let _ = inputs.push(InputConfig::new(i as u8 + 1, relay, *duration_ms, behavior));
        }

        Self {
            relays,
            inputs,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

/// Copy `s` into a bounded string, truncating at a character boundary.
pub fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
