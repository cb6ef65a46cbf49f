//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured board events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A display or MQTT adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::{BoardEvent, Cause};
use crate::app::ports::EventSink;

/// Adapter that logs every [`BoardEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &BoardEvent) {
        match event {
            BoardEvent::Started { relays, mappings } => {
                info!("START | relays={} mappings={}", relays, mappings);
            }
            BoardEvent::RelaySwitched { relay, on, cause } => match cause {
                Cause::Input(input, direction) => info!(
                    "RELAY | K{} {} | IN{} {:?}",
                    relay,
                    if *on { "ON" } else { "OFF" },
                    input,
                    direction
                ),
                Cause::TimerExpired => info!("RELAY | K{} OFF | timer expired", relay),
                Cause::Manual(input) => info!(
                    "RELAY | K{} {} | manual via IN{}",
                    relay,
                    if *on { "ON" } else { "OFF" },
                    input
                ),
            },
            BoardEvent::TimerArmed { relay, duration_ms } => {
                info!("TIMER | K{} armed {}ms", relay, duration_ms);
            }
            BoardEvent::TimerCancelled { relay } => {
                info!("TIMER | K{} cancelled", relay);
            }
            BoardEvent::Unmapped { input } => {
                info!("INPUT | IN{} has no mapping", input);
            }
            BoardEvent::ButtonPressed { button } => {
                info!("PANEL | button {} pressed", button);
            }
            BoardEvent::Malformed { raw } => {
                warn!("QUEUE | malformed message 0x{:02x} dropped", raw);
            }
        }
    }
}
