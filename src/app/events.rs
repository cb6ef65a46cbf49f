//! Outbound board events.
//!
//! The [`RelayController`](super::service::RelayController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log to serial, refresh the LED
//! display, publish over MQTT, etc.

use crate::events::Direction;
use crate::ids::{ButtonId, InputId, RelayId};

/// Why a relay changed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// A debounced input event, through its mapping's behavior.
    Input(InputId, Direction),
    /// The relay's countdown ran out.
    TimerExpired,
    /// Manual activation from the status/control layer.
    Manual(InputId),
}

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The controller is ready (carries relay and mapping counts).
    Started { relays: usize, mappings: usize },

    /// A relay was driven to a new level.
    RelaySwitched { relay: RelayId, on: bool, cause: Cause },

    /// A countdown was started (or restarted) on a relay.
    TimerArmed { relay: RelayId, duration_ms: u32 },

    /// A running countdown was stopped before expiry.
    TimerCancelled { relay: RelayId },

    /// An input event arrived for an input with no mapping.
    Unmapped { input: InputId },

    /// A front-panel button was pressed.
    ButtonPressed { button: ButtonId },

    /// A queue byte could not be decoded and was dropped.
    Malformed { raw: u8 },
}
